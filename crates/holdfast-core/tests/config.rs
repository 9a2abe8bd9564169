//! Tests for the process-wide configuration record

use holdfast_core::config::{DebugConfig, HandlerFlags};

#[test]
fn test_default_config()
{
    let cfg = DebugConfig::default();
    assert!(cfg.flags.is_empty());
    assert!(cfg.options.is_empty());
    assert!(!cfg.init_done);
    assert!(!cfg.verbose);
    assert!(!cfg.disabled);
    assert!(!cfg.quiet);
}

#[test]
fn test_handler_flags_roundtrip_through_raw_bits()
{
    // The raw word crosses the C ABI, so from_bits_truncate must accept it.
    let flags = HandlerFlags::ALT_STACK;
    assert_eq!(HandlerFlags::from_bits_truncate(flags.bits()), flags);

    // Unknown bits are dropped, not rejected.
    let with_junk = HandlerFlags::from_bits_truncate(0xffff_fff1);
    assert_eq!(with_junk, HandlerFlags::ALT_STACK);
}

// The environment is process-global, so everything env-driven lives in one
// test to keep the harness from interleaving variable writes.
#[test]
fn test_from_env()
{
    std::env::remove_var("HOLDFAST_DISABLE");
    std::env::remove_var("HOLDFAST_VERBOSE");
    std::env::remove_var("HOLDFAST_QUIET");
    std::env::remove_var("HOLDFAST_ALTSTACK");
    std::env::remove_var("HOLDFAST_OPTIONS");

    let cfg = DebugConfig::from_env();
    assert!(!cfg.disabled);
    assert!(!cfg.verbose);
    assert!(!cfg.quiet);
    assert!(cfg.flags.is_empty());
    assert!(cfg.options.is_empty());

    std::env::set_var("HOLDFAST_DISABLE", "1");
    std::env::set_var("HOLDFAST_VERBOSE", "yes");
    std::env::set_var("HOLDFAST_QUIET", "0");
    std::env::set_var("HOLDFAST_ALTSTACK", "1");
    std::env::set_var("HOLDFAST_OPTIONS", "-ex continue");

    let cfg = DebugConfig::from_env();
    assert!(cfg.disabled);
    assert!(cfg.verbose);
    assert!(!cfg.quiet); // "0" counts as unset
    assert!(cfg.flags.contains(HandlerFlags::ALT_STACK));
    assert_eq!(cfg.options, "-ex continue");

    std::env::remove_var("HOLDFAST_DISABLE");
    std::env::remove_var("HOLDFAST_VERBOSE");
    std::env::remove_var("HOLDFAST_QUIET");
    std::env::remove_var("HOLDFAST_ALTSTACK");
    std::env::remove_var("HOLDFAST_OPTIONS");
}
