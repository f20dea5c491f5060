use compemu_core::config::{DEFAULT_MACROBLOCKS_PER_INSN, DEFAULT_MAX_GUEST_INSNS, MAX_CAPACITY};
use compemu_core::{CompilerConfig, CompilerError, StateLayout};

#[test]
fn default_config() {
    let cfg = CompilerConfig::default();
    assert_eq!(cfg.max_guest_insns, DEFAULT_MAX_GUEST_INSNS);
    assert_eq!(cfg.macroblocks_per_insn, DEFAULT_MACROBLOCKS_PER_INSN);
    assert_eq!(cfg.capacity(), Ok(4096));
    assert_eq!(cfg.layout, StateLayout::guest_regs());
}

#[test]
fn parse_partial_toml() {
    let cfg: CompilerConfig = toml::from_str("max_guest_insns = 64\n").unwrap();
    assert_eq!(cfg.max_guest_insns, 64);
    assert_eq!(cfg.macroblocks_per_insn, DEFAULT_MACROBLOCKS_PER_INSN);
    assert_eq!(cfg.capacity(), Ok(256));
}

#[test]
fn parse_layout_override() {
    let src = r#"
macroblocks_per_insn = 6

[layout]
flags_cznv = 200
flags_x = 204
"#;
    let cfg: CompilerConfig = toml::from_str(src).unwrap();
    assert_eq!(cfg.macroblocks_per_insn, 6);
    assert_eq!(cfg.layout.flags_cznv, 200);
    assert_eq!(cfg.layout.flags_x, 204);
    assert_eq!(cfg.layout.pc, StateLayout::guest_regs().pc);
}

#[test]
fn empty_toml_is_default() {
    let cfg: CompilerConfig = toml::from_str("").unwrap();
    assert_eq!(cfg, CompilerConfig::default());
}

#[test]
fn config_round_trips_through_toml() {
    let cfg = CompilerConfig {
        max_guest_insns: 12,
        ..CompilerConfig::default()
    };
    let text = toml::to_string(&cfg).unwrap();
    let back: CompilerConfig = toml::from_str(&text).unwrap();
    assert_eq!(back, cfg);
}

#[test]
fn capacity_overflow_is_an_error() {
    let cfg = CompilerConfig {
        max_guest_insns: usize::MAX,
        ..CompilerConfig::default()
    };
    assert_eq!(
        cfg.capacity(),
        Err(CompilerError::InvalidCapacity {
            max_guest_insns: usize::MAX,
            macroblocks_per_insn: DEFAULT_MACROBLOCKS_PER_INSN,
        })
    );
}

#[test]
fn overflowing_toml_is_rejected() {
    let src = "max_guest_insns = 9223372036854775807\nmacroblocks_per_insn = 4\n";
    let err = toml::from_str::<CompilerConfig>(src).unwrap_err();
    assert!(
        err.to_string().contains("invalid translation unit capacity"),
        "{err}"
    );
}

#[test]
fn zero_capacity_is_rejected() {
    assert!(toml::from_str::<CompilerConfig>("max_guest_insns = 0\n").is_err());
    assert!(toml::from_str::<CompilerConfig>("macroblocks_per_insn = 0\n").is_err());
}

#[test]
fn capacity_limit_is_inclusive() {
    let at_limit = CompilerConfig {
        max_guest_insns: MAX_CAPACITY,
        macroblocks_per_insn: 1,
        ..CompilerConfig::default()
    };
    assert_eq!(at_limit.capacity(), Ok(MAX_CAPACITY));
    let over = CompilerConfig {
        max_guest_insns: MAX_CAPACITY + 1,
        ..at_limit
    };
    assert!(over.validate().is_err());
}
