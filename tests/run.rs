use parking_lot::Mutex;
use std::sync::Arc;

use testrig::executor::ExecutorKind;
use testrig::mock::{Callable, Matcher, Mock, Value, ValueKind};
use testrig::models::RunnableUnit;
use testrig::registry::{self, Filter};
use testrig::reporter::{CompositeReporter, JsonReporter, ProgressReporter, Reporter, ReporterOptions, SharedBuffer};
use testrig::runner::{run_all, RunOptions, TestRunner};

fn progress(buffer: &SharedBuffer, verbose: bool) -> Arc<ProgressReporter> {
    let options = ReporterOptions {
        verbose,
        args: "--seed 42".to_string(),
    };
    Arc::new(ProgressReporter::new(buffer.sink(), options))
}

#[test]
fn two_serial_units_with_one_failure() {
    let units = vec![
        Arc::new(
            RunnableUnit::new("TestFirst")
                .test("test_one", |t| Ok(t.assert(true, "one")?))
                .test("test_two", |t| Ok(t.assert_eq(2, 1 + 1)?)),
        ),
        Arc::new(
            RunnableUnit::new("TestSecond")
                .test("test_three", |t| Ok(t.assert_includes(&[1, 2, 3], &3)?))
                .test("test_four", |t| Ok(t.assert_eq("four", "five")?)),
        ),
    ];

    let buffer = SharedBuffer::new();
    let passed = run_all(&units, progress(&buffer, false), &RunOptions::default().with_seed(42)).unwrap();
    let output = buffer.contents();

    assert!(!passed);
    assert!(output.starts_with("Run options: --seed 42\n\n# Running:\n\n"));
    assert!(output.contains("  1) Failure:\nTestSecond#test_four"));
    assert!(output.contains("Expected: \"four\"\n  Actual: \"five\""));
    assert!(output.ends_with("\n4 runs, 4 assertions, 1 failures, 0 errors, 0 skips\n"));
}

#[test]
fn mixed_run_through_composite_reporter() {
    let parallel = RunnableUnit::new("TestParallel")
        .parallel()
        .test("test_mock_in_body", |t| {
            let mut mock = Mock::new();
            mock.expect_with("lookup", "found", vec![Matcher::kind(ValueKind::Str)]);
            t.assert_eq(Value::from("found"), mock.call("lookup", &[Value::from("key")])?)?;
            mock.verify()?;
            Ok(())
        })
        .test("test_unverified_mock", |_| {
            let mut mock = Mock::new();
            mock.expect("never_called", ());
            mock.verify()?;
            Ok(())
        })
        .test("test_error", |_| Err(anyhow::anyhow!("database unavailable")))
        .test("test_skip", |t| Ok(t.skip("not on this platform")?));
    let serial = RunnableUnit::new("TestSerial").test("test_ok", |t| {
        t.pass();
        Ok(())
    });
    let units = vec![Arc::new(parallel), Arc::new(serial)];

    for executor in [ExecutorKind::Thread, ExecutorKind::Task] {
        let text = SharedBuffer::new();
        let json = SharedBuffer::new();
        let composite = CompositeReporter::default()
            .with(progress(&text, false))
            .with(Arc::new(JsonReporter::new(json.sink())));
        let runner = TestRunner::new(RunOptions::default().with_workers(4).with_executor(executor))
            .with_reporter(Arc::new(composite));

        let outcome = runner.run_units(&units).unwrap();
        assert!(!outcome.passed);
        assert_eq!(outcome.summary.runs, 5);
        assert_eq!(outcome.summary.assertions, 2);
        assert_eq!(
            (outcome.summary.failures, outcome.summary.errors, outcome.summary.skips),
            (1, 1, 1)
        );

        let output = text.contents();
        assert!(output.contains("Error:\nTestParallel#test_error"));
        assert!(output.contains("expected never_called() => nil"));
        assert!(!output.contains("Skipped:"));

        let doc: serde_json::Value = serde_json::from_str(&json.contents()).unwrap();
        assert_eq!(doc["summary"]["runs"], 5);
        assert_eq!(doc["results"].as_array().map(Vec::len), Some(3));
    }
}

#[test]
fn verbose_run_lists_skips() {
    let unit = RunnableUnit::new("TestPending").test("test_later", |t| Ok(t.skip("later")?));
    let buffer = SharedBuffer::new();
    let reporter = progress(&buffer, true);

    assert!(run_all(&[Arc::new(unit)], reporter.clone(), &RunOptions::default().verbose(true)).unwrap());
    let output = buffer.contents();
    assert!(output.contains("TestPending#test_later = 0.00 s = S\n"));
    assert!(output.contains("  1) Skipped:\nTestPending#test_later"));
    assert!(output.ends_with("\n1 runs, 0 assertions, 0 failures, 0 errors, 1 skips\n"));
    assert!(reporter.passed());
}

#[test]
fn zero_workers_runs_parallel_units_serially() {
    let threads = Arc::new(Mutex::new(Vec::new()));
    let seen = threads.clone();
    let unit = RunnableUnit::new("TestInline").parallel().test("test_where", move |_| {
        seen.lock().push(std::thread::current().id());
        Ok(())
    });

    let options = RunOptions::default().with_workers(0);
    let reporter = progress(&SharedBuffer::new(), false);
    assert!(run_all(&[Arc::new(unit)], reporter, &options).unwrap());
    assert_eq!(*threads.lock(), vec![std::thread::current().id()]);
}

#[tokio::test]
async fn task_executor_runs_from_async_caller() {
    let mut unit = RunnableUnit::new("TestAsyncCaller").parallel();
    for i in 0..6 {
        unit = unit.test(format!("test_{i}"), |t| Ok(t.assert(true, "ran")?));
    }
    let units = vec![Arc::new(unit)];

    let buffer = SharedBuffer::new();
    let options = RunOptions::default().with_workers(3).with_executor(ExecutorKind::Task);
    assert!(run_all(&units, progress(&buffer, false), &options).unwrap());
    assert!(buffer.contents().ends_with("\n6 runs, 6 assertions, 0 failures, 0 errors, 0 skips\n"));
}

// The only test in this binary that touches the global registry.
#[test]
fn global_run_uses_registry_and_after_run_hooks() {
    let order = Arc::new(Mutex::new(Vec::new()));

    registry::register(RunnableUnit::new("TestRegisteredA").test("test_a", |t| Ok(t.assert(true, "a")?)));
    registry::register(
        RunnableUnit::new("TestRegisteredB")
            .parallel()
            .test("test_b", |t| Ok(t.assert(true, "b")?))
            .test("test_c", |t| Ok(t.assert(true, "c")?)),
    );
    for name in ["first", "second"] {
        let order = order.clone();
        registry::after_run(move || order.lock().push(name));
    }

    let unit = registry::all_units()
        .into_iter()
        .find(|u| u.name() == "TestRegisteredB")
        .unwrap();
    assert_eq!(registry::methods_matching(&unit, "/test_[bc]/").unwrap().len(), 2);

    let buffer = SharedBuffer::new();
    let options = RunOptions::default().with_filter(Filter::parse("/TestRegistered/").unwrap());
    let outcome = TestRunner::new(options)
        .with_reporter(progress(&buffer, false))
        .run()
        .unwrap();

    assert!(outcome.passed);
    assert_eq!(outcome.summary.runs, 3);
    assert_eq!(*order.lock(), vec!["second", "first"]);

    registry::reset();
    assert!(registry::all_units().is_empty());
}
