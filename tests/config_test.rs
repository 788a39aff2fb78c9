use circulib::config::Config;
use serial_test::serial;
use std::env;
use std::time::Duration;

fn clear_env() {
    // set_var/remove_var are unsafe in edition 2024; #[serial] keeps these
    // tests from racing each other over the process environment.
    unsafe {
        env::remove_var("PROFILE");
        env::remove_var("DATABASE_URL");
        env::remove_var("GATEWAY_TIMEOUT_SECS");
    }
}

#[test]
#[serial]
fn defaults_apply_without_env() {
    clear_env();

    let config = Config::from_env();
    assert_eq!(config.profile, "default");
    assert_eq!(config.database_url, "sqlite://circulib.db?mode=rwc");
    assert_eq!(config.gateway_timeout, Duration::from_secs(10));
}

#[test]
#[serial]
fn profile_changes_the_default_database_file() {
    clear_env();
    unsafe {
        env::set_var("PROFILE", "staging");
    }

    let config = Config::from_env();
    assert_eq!(config.database_url, "sqlite://circulib_staging.db?mode=rwc");

    clear_env();
}

#[test]
#[serial]
fn explicit_values_win() {
    clear_env();
    unsafe {
        env::set_var("DATABASE_URL", "sqlite::memory:");
        env::set_var("GATEWAY_TIMEOUT_SECS", "3");
    }

    let config = Config::from_env();
    assert_eq!(config.database_url, "sqlite::memory:");
    assert_eq!(config.gateway_timeout, Duration::from_secs(3));

    clear_env();
}

#[test]
#[serial]
fn unparseable_timeout_falls_back_to_the_default() {
    clear_env();
    unsafe {
        env::set_var("GATEWAY_TIMEOUT_SECS", "soon");
    }

    let config = Config::from_env();
    assert_eq!(config.gateway_timeout, Duration::from_secs(10));

    clear_env();
}
