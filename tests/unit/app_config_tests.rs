/*!
 * Tests for configuration loading and validation
 */

use anyhow::Result;
use std::fs;
use std::time::Duration;
use openie_harvest::app_config::{Config, LogLevel};
use openie_harvest::retry::MAX_DELAY;
use crate::common;

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaultConfig() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config.output.file_prefix, "sb6657");
    let written: Config = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(written.api.base_url, config.api.base_url);
    Ok(())
}

#[test]
fn test_loadOrCreate_withExistingFile_shouldReadIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{"api": {"page_size": 50}, "log_level": "debug"}"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.api.page_size, 50);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.output.segment_size, 1000);
    Ok(())
}

#[test]
fn test_loadOrCreate_withMalformedFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

#[test]
fn test_retryConfig_policy_shouldMatchDefaults() -> Result<()> {
    let policy = Config::default().retry.policy()?;
    assert_eq!(policy.max_retries, 3);
    assert_eq!(policy.initial_delay, Duration::from_secs(1));
    assert_eq!(policy.delay_for(3), Duration::from_secs(4));
    Ok(())
}

#[test]
fn test_retryConfig_withHugeBackoff_shouldPassValidationAndCapDelays() -> Result<()> {
    let mut config = Config::default();
    config.retry.backoff_factor = 1e300;
    config.validate()?;

    let policy = config.retry.policy()?;
    let delays: Vec<Duration> = (1..=policy.max_attempts()).map(|n| policy.delay_for(n)).collect();

    assert_eq!(delays[0], Duration::from_secs(1));
    assert!(delays[1..].iter().all(|d| *d == MAX_DELAY));
    Ok(())
}

#[test]
fn test_retryConfig_withHugeRetryCount_shouldCapLastDelay() -> Result<()> {
    let mut config = Config::default();
    config.retry.max_retries = u32::MAX;
    config.validate()?;

    let policy = config.retry.policy()?;
    assert_eq!(policy.delay_for(policy.max_attempts()), MAX_DELAY);
    Ok(())
}

#[test]
fn test_validate_withOverflowingInitialDelay_shouldFail() {
    let mut config = Config::default();
    config.retry.initial_delay_secs = 1e300;

    assert!(config.validate().is_err());
    assert!(config.retry.policy().is_err());
}

#[test]
fn test_validate_withNegativeInitialDelay_shouldFail() {
    let mut config = Config::default();
    config.retry.initial_delay_secs = -1.0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withShrinkingBackoff_shouldFail() {
    let mut config = Config::default();
    config.retry.backoff_factor = 0.5;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withEmptySentinel_shouldFail() {
    let mut config = Config::default();
    config.openie.sentinel_entity.clear();
    assert!(config.validate().is_err());
}

#[test]
fn test_logLevel_toLevelFilter_shouldMapEachLevel() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
