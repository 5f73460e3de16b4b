//! testrig - parallel-capable unit test runner
//!
//! The binary registers a built-in self-check suite that exercises the mock
//! engine through both executors and runs it like any other suite.
//!
//! ## Usage
//!
//! ```bash
//! # Run with a fixed order
//! testrig --seed 1234
//!
//! # Only mock-related methods, one line per result
//! testrig --name /mock/ --verbose
//!
//! # Parallel units on the tokio backend, plus a JSON report
//! testrig --executor task --workers 4 --json report.json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

use testrig::cli::Args;
use testrig::config::{self, EnvConfig, RunConfig};
use testrig::mock::{define_interface, Callable, Interface, Matcher, Mock, MockError, Mocker, StrictMock, Value, ValueKind};
use testrig::models::RunnableUnit;
use testrig::registry;
use testrig::reporter::{self, JsonReporter, ProgressReporter, ReporterOptions};
use testrig::runner::{exit_code, TestRunner};
use testrig::utils::init_logger;

fn main() -> ExitCode {
    let args = Args::parse();
    if args.env_help {
        config::print_env_help();
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(passed) => exit_code(passed),
        Err(err) => {
            eprintln!("testrig: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> Result<bool> {
    let env = EnvConfig::load();
    let mut config = match args.config.as_ref().or(env.config_file.as_ref()) {
        Some(path) => RunConfig::load(path)?,
        None => config::load_default()?,
    };
    config.merge_env(&env);
    args.apply(&mut config);
    config.validate()?;

    init_logger(config.log_level());

    let options = config.options()?;
    info!("Run options: {}", options.args());

    let progress = ProgressReporter::new(
        reporter::stdout(),
        ReporterOptions {
            verbose: options.verbose,
            args: options.args(),
        },
    );
    let mut runner = TestRunner::new(options).with_reporter(Arc::new(progress));
    if let Some(path) = &args.json {
        let file = File::create(path).with_context(|| format!("Failed to create {path}"))?;
        runner = runner.with_reporter(Arc::new(JsonReporter::new(Box::new(file)).pretty()));
    }

    register_self_check();
    registry::after_run(|| info!("Self-check suite finished"));

    Ok(runner.run()?.passed)
}

/// Calculator double wrapped by `Mocker` in the self-check suite
struct Calculator;

impl Callable for Calculator {
    fn call(&mut self, name: &str, args: &[Value]) -> Result<Value, MockError> {
        match (name, args) {
            ("add", [Value::Int(a), Value::Int(b)]) => Ok(Value::Int(a + b)),
            ("version", []) => Ok(Value::from("1.0")),
            _ => Err(MockError::NoMethod { name: name.to_string() }),
        }
    }

    fn responds_to(&self, name: &str) -> bool {
        matches!(name, "add" | "version")
    }
}

fn register_self_check() {
    define_interface(Interface::new("Calculator").method("add", 2).method("version", 0));

    registry::register(
        RunnableUnit::new("TestMock")
            .parallel()
            .test("test_mock_returns_expected_value", |t| {
                let mut mock = Mock::new();
                mock.expect("meaning_of_life", 42);
                t.assert_eq(Value::Int(42), mock.call("meaning_of_life", &[])?)?;
                mock.verify()?;
                Ok(())
            })
            .test("test_mock_rejects_unexpected_arguments", |t| {
                let mut mock = Mock::new();
                mock.expect_with("square", 4, vec![Matcher::kind(ValueKind::Int)]);
                let err = mock.call("square", &[Value::from("x")]);
                t.assert(matches!(err, Err(MockError::UnexpectedArguments { .. })), "string accepted as Int")?;
                Ok(())
            })
            .test("test_mock_verify_reports_missing_call", |t| {
                let mut mock = Mock::new();
                mock.expect("foo", 1);
                let err = mock.verify().err().map(|e| e.to_string());
                t.assert_eq(Some("expected foo() => 1".to_string()), err)?;
                Ok(())
            })
            .test("test_mock_consumes_expectations_in_order", |t| {
                let mut mock = Mock::new();
                mock.expect("next", 1).expect("next", 2);
                t.assert_eq(Value::Int(1), mock.call("next", &[])?)?;
                t.assert_eq(Value::Int(2), mock.call("next", &[])?)?;
                t.assert(mock.call("next", &[]).is_err(), "third call accepted")?;
                Ok(())
            }),
    );

    registry::register(
        RunnableUnit::new("TestMocker")
            .parallel()
            .test("test_mocker_intercepts_expected_methods", |t| {
                let mut calc = Mocker::new(Calculator);
                calc.expect_with("add", 5, vec![Matcher::any(), Matcher::any()]);
                t.assert_eq(Value::Int(5), calc.call("add", &[Value::from(1), Value::from(1)])?)?;
                t.assert_eq(Value::from("1.0"), calc.call("version", &[])?)?;
                calc.verify()?;
                t.assert_eq(Value::Int(2), calc.call("add", &[Value::from(1), Value::from(1)])?)?;
                Ok(())
            }),
    );

    registry::register(
        RunnableUnit::new("TestStrictMock")
            .test("test_strict_mock_rejects_undefined_method", |t| {
                let mut mock = StrictMock::new("Calculator");
                let err = mock.expect("divide", 1).err().map(|e| e.to_string());
                t.assert_eq(
                    Some("expected Calculator to define `divide`, but it doesn't".to_string()),
                    err,
                )?;
                Ok(())
            })
            .test("test_strict_mock_checks_arity", |t| {
                let mut mock = StrictMock::new("::Calculator");
                let err = mock.expect_with("version", "2.0", vec![Matcher::from(1)]).err();
                t.assert(matches!(err, Some(MockError::ArityMismatch { given: 1, .. })), "arity not checked")?;
                mock.expect("version", "2.0")?;
                t.assert_eq(Value::from("2.0"), mock.call("version", &[])?)?;
                mock.verify()?;
                Ok(())
            }),
    );

    registry::register(
        RunnableUnit::new("TestRegistry").test("test_filter_selects_by_regex", |t| {
            let unit = RunnableUnit::new("TestSample")
                .test("test_alpha", |_| Ok(()))
                .test("test_beta", |_| Ok(()));
            let selected = registry::methods_matching(&unit, "/alpha/")?;
            t.assert_eq(vec!["test_alpha".to_string()], selected)?;
            let exact = registry::methods_matching(&unit, "TestSample#test_beta")?;
            t.assert_eq(vec!["test_beta".to_string()], exact)?;
            Ok(())
        }),
    );
}
