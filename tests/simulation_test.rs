use std::process::Command;

fn run_headless(extra_args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_coffee_shop"))
        .args(["--ticks", "600", "--delta", "0.1", "--seed", "42"])
        .args(extra_args)
        .env("RUST_LOG", "warn,coffee_shop=info")
        .output()
        .expect("Failed to execute simulation")
}

/// Test that the simulation runs in headless mode without crashing
#[test]
fn test_headless_simulation_runs() {
    let output = run_headless(&[]);

    assert!(
        output.status.success(),
        "Simulation failed to run in headless mode. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("=== Final State ==="),
        "Simulation did not complete properly. stdout: {}",
        stdout
    );
    assert!(stdout.contains("=== Coffee Shop Summary ==="));
    assert!(stdout.contains("--- Coffee Machines ---"));
}

/// Test that customers show up and get served by the scripted player
#[test]
fn test_customers_spawn_and_get_served() {
    let output = run_headless(&[]);
    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Spawned"),
        "No customers were spawned. stderr: {}",
        stderr
    );
    assert!(
        stderr.contains("Served coffee to"),
        "No coffee was served. stderr: {}",
        stderr
    );
}

/// Test that a broken config file is reported instead of ignored
#[test]
fn test_invalid_config_is_rejected() {
    let path = std::env::temp_dir().join(format!("coffee_shop_bad_{}.ron", std::process::id()));
    std::fs::write(&path, "(brew: (beans_required: 0))").expect("write temp config");

    let path_arg = path.to_string_lossy().to_string();
    let output = run_headless(&["--config", &path_arg]);
    std::fs::remove_file(&path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("beans_required"), "stderr: {}", stderr);
}
