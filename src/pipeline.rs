#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use anyhow::Result;

use crate::{
    config::JobConfig,
    harness::Harness,
    images::{AttachReport, attach_images, image_specs},
    materialize::materialize,
    results::ResultsDocument,
    scoring::{PartIndex, merge_tests, score},
    submission::Submission,
};

/// How a grading job ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The harness reported success; results were scored and decorated.
    Graded {
        /// Aggregate score written to the results.
        score:  f64,
        /// What happened to the requested images.
        images: AttachReport,
    },
    /// The harness reported failure; results were merged but not decorated.
    GradingFailed {
        /// Aggregate score, if one could be computed.
        score: Option<f64>,
    },
}

/// Runs one grading job: materialize files, run the harness, then merge,
/// score, attach images, and write the results back.
pub async fn run(config: &JobConfig, harness: &impl Harness) -> Result<Outcome> {
    let paths = config.paths();
    tracing::info!("Treating '{}' as JOB_DIR", paths.job_dir().display());

    let submission = Submission::load(paths.data_file())?;

    let written = materialize(&paths, &submission.autograder_files)?;
    if written > 0 {
        tracing::info!("Materialized {written} autograder file(s)");
    }

    harness.run().await;

    tracing::info!("Starting image addition to the results.");
    let mut results = ResultsDocument::load(paths.results_file())?;

    let harness_tests = std::mem::take(&mut results.tests);
    results.tests = merge_tests(submission.extra_parts, harness_tests);
    let computed = score(&results.tests);

    if !results.succeeded {
        tracing::info!("Job did not succeed. Not Adding Images.");
        results.score = match computed {
            Ok(ratio) => Some(ratio),
            Err(e) => {
                tracing::warn!("{e}");
                None
            }
        };
        results.save(paths.results_file())?;
        return Ok(Outcome::GradingFailed {
            score: results.score,
        });
    }

    let ratio = computed?;
    results.score = Some(ratio);

    let specs = image_specs(submission.images.as_ref())?;
    let index = PartIndex::build(&results.tests);
    let report = attach_images(&mut results, &index, specs, &paths);
    tracing::info!(
        "Attached {} image(s), {} unavailable, {} skipped",
        report.attached,
        report.missing,
        report.skipped
    );

    results.save(paths.results_file())?;

    Ok(Outcome::Graded {
        score:  ratio,
        images: report,
    })
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use serde_json::{Value, json};

    use super::*;
    use crate::{error::EntrypointError, paths::JobPaths};

    /// Stands in for the external harness by writing a fixed results file.
    struct FakeHarness {
        /// Where the results document goes.
        results_file: PathBuf,
        /// What the "harness" reports.
        results:      Value,
    }

    impl Harness for FakeHarness {
        async fn run(&self) {
            fs::write(&self.results_file, self.results.to_string()).expect("write results");
        }
    }

    fn temp_job(data: Value) -> (JobConfig, JobPaths) {
        let root = std::env::temp_dir().join(format!("grade-pipeline-{}", uuid::Uuid::new_v4()));
        for dir in ["data", "images", "results"] {
            fs::create_dir_all(root.join(dir)).expect("create job dirs");
        }
        let config = JobConfig::builder().job_dir(root).build();
        let paths = config.paths();
        fs::write(paths.data_file(), data.to_string()).expect("write data");
        (config, paths)
    }

    fn harness(paths: &JobPaths, results: Value) -> FakeHarness {
        FakeHarness {
            results_file: paths.results_file().to_path_buf(),
            results,
        }
    }

    fn written(paths: &JobPaths) -> Value {
        serde_json::from_slice(&fs::read(paths.results_file()).expect("read results"))
            .expect("results are JSON")
    }

    #[tokio::test]
    async fn merges_extra_parts_and_scores() {
        let (config, paths) = temp_job(json!({
            "submitted_answers": {"_extra_parts": [{"name": "p1", "points": 5, "max_points": 10}]},
            "params": {"_images": []}
        }));
        let fake = harness(&paths, json!({
            "succeeded": true,
            "tests": [{"name": "p2", "points": 3, "max_points": 5}]
        }));

        let outcome = run(&config, &fake).await.expect("pipeline runs");

        let Outcome::Graded { score, .. } = outcome else {
            panic!("expected a graded outcome, got {outcome:?}");
        };
        assert!((score - 8.0 / 15.0).abs() < 1e-12);
        let doc = written(&paths);
        assert_eq!(doc["tests"][0]["name"], json!("p1"));
        assert_eq!(doc["tests"][1]["name"], json!("p2"));
        assert!(doc.get("images").is_none());
        let _ = fs::remove_dir_all(paths.job_dir());
    }

    #[tokio::test]
    async fn failed_grading_skips_images_even_when_unconfigured() {
        let (config, paths) = temp_job(json!({
            "submitted_answers": {},
            "params": {"_images": [{"label": "x", "filename": "missing.png"}]}
        }));
        let fake = harness(&paths, json!({
            "succeeded": false,
            "tests": [{"name": "p1", "points": 0, "max_points": 2}]
        }));

        let outcome = run(&config, &fake).await.expect("soft abort is not an error");

        assert_eq!(outcome, Outcome::GradingFailed { score: Some(0.0) });
        let doc = written(&paths);
        assert!(doc.get("images").is_none());
        assert_eq!(doc["succeeded"], json!(false));
        let _ = fs::remove_dir_all(paths.job_dir());
    }

    #[tokio::test]
    async fn failed_grading_with_no_tests_writes_no_score() {
        let (config, paths) = temp_job(json!({"submitted_answers": {}}));
        let fake = harness(&paths, json!({"succeeded": false}));

        let outcome = run(&config, &fake).await.expect("soft abort is not an error");

        assert_eq!(outcome, Outcome::GradingFailed { score: None });
        assert!(written(&paths).get("score").is_none());
        let _ = fs::remove_dir_all(paths.job_dir());
    }

    #[tokio::test]
    async fn failed_grading_preserves_what_the_harness_wrote() {
        let (config, paths) = temp_job(json!({"submitted_answers": {}}));
        let fake = harness(&paths, json!({
            "succeeded": false,
            "tests": [{"name": "p1", "points": 0, "max_points": 4, "message": null, "output": ["line1"]}]
        }));

        run(&config, &fake).await.expect("soft abort is not an error");

        let test = &written(&paths)["tests"][0];
        assert_eq!(test["max_points"], json!(4));
        assert!(test["max_points"].is_u64());
        assert!(test.as_object().unwrap().contains_key("message"));
        assert_eq!(test["output"], json!(["line1"]));
        let _ = fs::remove_dir_all(paths.job_dir());
    }

    #[tokio::test]
    async fn successful_grading_requires_image_params() {
        let (config, paths) = temp_job(json!({"submitted_answers": {}}));
        let fake = harness(&paths, json!({
            "succeeded": true,
            "tests": [{"name": "p1", "points": 1, "max_points": 1}]
        }));

        let err = run(&config, &fake).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<EntrypointError>(),
            Some(EntrypointError::ImagesNotConfigured)
        ));
        let _ = fs::remove_dir_all(paths.job_dir());
    }

    #[tokio::test]
    async fn successful_grading_with_no_points_is_fatal() {
        let (config, paths) = temp_job(json!({
            "submitted_answers": {"_extra_parts": []},
            "params": {"_images": []}
        }));
        let fake = harness(&paths, json!({"succeeded": true, "tests": []}));

        let err = run(&config, &fake).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<EntrypointError>(),
            Some(EntrypointError::UndefinedScore { tests: 0 })
        ));
        // the harness's own document is left as written
        assert!(written(&paths).get("score").is_none());
        let _ = fs::remove_dir_all(paths.job_dir());
    }

    #[tokio::test]
    async fn images_bind_to_parts_and_main() {
        let (config, paths) = temp_job(json!({
            "submitted_answers": {"_extra_parts": [{"name": "p1", "points": 1, "max_points": 1}]},
            "params": {"_images": [
                {"label": "graph", "filename": "g.png", "part": "p1"},
                {"label": "overview", "filename": "g.png"},
                {"label": "bad", "filename": "note.txt", "part": "p1"},
                {"label": "lost", "filename": "g.png", "part": "p9"}
            ]}
        }));
        fs::write(paths.image("g.png"), b"\x89PNG\r\n\x1a\n").expect("write png");
        fs::write(paths.image("note.txt"), "text").expect("write txt");
        let fake = harness(&paths, json!({"succeeded": true}));

        let outcome = run(&config, &fake).await.expect("pipeline runs");

        assert_eq!(outcome, Outcome::Graded {
            score:  1.0,
            images: AttachReport {
                attached: 2,
                missing:  1,
                skipped:  1,
            },
        });
        let doc = written(&paths);
        assert_eq!(doc["tests"][0]["images"][0]["label"], json!("graph"));
        assert_eq!(doc["tests"][0]["images"][1], Value::Null);
        assert_eq!(doc["images"].as_array().map(Vec::len), Some(1));
        assert_eq!(doc["images"][0]["label"], json!("overview"));
        let _ = fs::remove_dir_all(paths.job_dir());
    }

    #[tokio::test]
    async fn autograder_files_exist_before_the_harness_runs() {
        let (config, paths) = temp_job(json!({
            "submitted_answers": {},
            "params": {
                "_autograder_files": [{"path": "helper.R", "contents": "eCA8LSAxCg=="}],
                "_images": []
            }
        }));

        /// Fails grading unless the helper file is already on disk.
        struct Checking(JobPaths);
        impl Harness for Checking {
            async fn run(&self) {
                let ok = self.0.resolve("helper.R").exists();
                let results = json!({
                    "succeeded": ok,
                    "tests": [{"name": "helper", "points": 1, "max_points": 1}]
                });
                fs::write(self.0.results_file(), results.to_string()).expect("write results");
            }
        }

        let outcome = run(&config, &Checking(paths.clone())).await.expect("pipeline runs");

        assert!(matches!(outcome, Outcome::Graded { .. }));
        assert_eq!(written(&paths)["succeeded"], json!(true));
        let _ = fs::remove_dir_all(paths.job_dir());
    }
}
