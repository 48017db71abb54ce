//! Edge case tests for bidi reordering in fos-textcore
//!
//! Tests for direction classes, paragraph reordering, position maps and the
//! bracket stack.
#![cfg(feature = "bidi")]

use fos_textcore::bidi::*;

const ALEF: char = '\u{05D0}';
const BET: char = '\u{05D1}';
const TAV: char = '\u{05EA}';

fn resolve(text: &str, base: BaseDirection) -> String {
    let resolver = BidiResolver::new();
    let mut out = vec![0u8; text.len()];
    let mut stack = BracketStack::new();
    resolver.resolve_paragraph(text.as_bytes(), base, Some(&mut out), None, &mut stack);
    String::from_utf8(out).unwrap()
}

// ============================================================================
// DIRECTION CLASS TESTS
// ============================================================================

#[test]
fn test_classify_hebrew_bounds() {
    assert_eq!(classify(ALEF as u32), Direction::Rtl);
    assert_eq!(classify(TAV as u32), Direction::Rtl);
    assert_eq!(classify(0x05CF), Direction::Ltr);
    assert_eq!(classify(0x05EB), Direction::Ltr);
    assert_eq!(classify(RLO), Direction::Rtl);
}

#[test]
fn test_classify_neutral_and_weak() {
    for c in " \t.,:;!?%/-=()[]{}<>@#&$|\"'`\\".chars() {
        assert_eq!(classify(c as u32), Direction::Neutral, "{:?}", c);
    }
    for c in '0'..='9' {
        assert_eq!(classify(c as u32), Direction::Weak);
    }
    assert_eq!(classify('z' as u32), Direction::Ltr);
    assert_eq!(classify('é' as u32), Direction::Ltr);
}

#[test]
fn test_mirror() {
    assert_eq!(mirror('(' as u32), ')' as u32);
    assert_eq!(mirror(']' as u32), '[' as u32);
    assert_eq!(mirror('<' as u32), '>' as u32);
    assert_eq!(mirror('a' as u32), 'a' as u32);
}

// ============================================================================
// BIDI REORDERING TESTS
// ============================================================================

#[test]
fn test_empty_paragraph() {
    let resolver = BidiResolver::new();
    let mut stack = BracketStack::new();
    let mut out: [u8; 0] = [];
    let mut map: [PositionEntry; 0] = [];
    let runs = resolver.resolve_paragraph(b"", BaseDirection::Rtl, Some(&mut out), Some(&mut map), &mut stack);
    assert_eq!(runs, 0);
}

#[test]
fn test_all_neutral_any_base() {
    for base in [BaseDirection::Ltr, BaseDirection::Rtl, BaseDirection::Auto] {
        assert_eq!(resolve("...", base), "...");
        assert_eq!(resolve("([{<>}])", base), "([{<>}])");
    }
}

#[test]
fn test_ltr_brackets_unchanged() {
    assert_eq!(resolve("abc(def)ghi", BaseDirection::Ltr), "abc(def)ghi");
    assert_eq!(resolve("abc(def)ghi", BaseDirection::Auto), "abc(def)ghi");
}

#[test]
fn test_rtl_inside_brackets() {
    let text = format!("A({ALEF}{BET})C");
    assert_eq!(resolve(&text, BaseDirection::Ltr), format!("A({BET}{ALEF})C"));
}

#[test]
fn test_deep_bracket_nesting() {
    // Deeper than the bracket stack: the extra pairs stay neutral
    let text = "((((((x))))))";
    assert_eq!(resolve(text, BaseDirection::Ltr), text);
}

#[test]
fn test_unbalanced_brackets() {
    assert_eq!(resolve("a(b", BaseDirection::Ltr), "a(b");
    assert_eq!(resolve("a)b", BaseDirection::Ltr), "a)b");
}

#[test]
fn test_pure_rtl_reversed() {
    let text = format!("{ALEF}{BET} {TAV}");
    assert_eq!(resolve(&text, BaseDirection::Rtl), format!("{TAV} {BET}{ALEF}"));
    assert_eq!(resolve(&text, BaseDirection::Auto), format!("{TAV} {BET}{ALEF}"));
}

#[test]
fn test_number_in_rtl_paragraph() {
    let text = format!("{ALEF} 3.14 {BET}");
    assert_eq!(resolve(&text, BaseDirection::Rtl), format!("{BET} 3.14 {ALEF}"));
}

#[test]
fn test_run_count() {
    let resolver = BidiResolver::new();
    let mut stack = BracketStack::new();
    let text = format!("ab {ALEF}{BET} cd");
    let runs = resolver.resolve_paragraph(text.as_bytes(), BaseDirection::Ltr, None, None, &mut stack);
    assert_eq!(runs, 3);
}

#[test]
fn test_runs_cover_text() {
    let resolver = BidiResolver::new();
    let mut stack = BracketStack::new();
    let text = format!("x {ALEF}(y) 12 {BET}.");
    let runs: Vec<BidiRun> = resolver.runs(text.as_bytes(), BaseDirection::Auto, &mut stack).collect();

    let mut expected_start = 0;
    for run in &runs {
        assert_eq!(run.bytes.start, expected_start);
        assert!(!run.bytes.is_empty());
        expected_start = run.bytes.end;
    }
    assert_eq!(expected_start, text.len());
}

#[test]
fn test_process_keeps_paragraph_breaks() {
    let resolver = BidiResolver::new();
    let text = format!("\n{ALEF}{BET}\n\nab\n");
    let mut out = vec![0u8; text.len()];
    assert_eq!(resolver.process(text.as_bytes(), &mut out, BaseDirection::Auto), 2);
    assert_eq!(String::from_utf8(out).unwrap(), format!("\n{BET}{ALEF}\n\nab\n"));
}

#[test]
fn test_config_default_direction() {
    let resolver = BidiResolver::new().with_config(BidiConfig::default().default_direction(BaseDirection::Rtl));
    assert_eq!(resolver.config().default_direction, BaseDirection::Rtl);
    let (align, dir) = resolver.calculate_align(TextAlign::Auto, BaseDirection::Auto, b"42");
    assert_eq!(dir, Direction::Rtl);
    assert_eq!(align, TextAlign::Right);
}

// ============================================================================
// POSITION MAP TESTS
// ============================================================================

#[test]
fn test_position_map_identity_for_ltr() {
    let resolver = BidiResolver::new();
    let mut map = [PositionEntry::default(); 4];
    for p in 0..4 {
        assert_eq!(resolver.logical_pos(b"abcd", BaseDirection::Ltr, p, &mut map), Some((p, false)));
    }
}

#[test]
fn test_position_round_trip() {
    let resolver = BidiResolver::new();
    let text = format!("ab {ALEF}{BET} 12");
    let n = text.chars().count();
    let mut map = vec![PositionEntry::default(); n];

    for base in [BaseDirection::Ltr, BaseDirection::Rtl] {
        for p in 0..n {
            let (logical, _) = resolver.logical_pos(text.as_bytes(), base, p, &mut map).unwrap();
            let (visual, _) = resolver.visual_pos(text.as_bytes(), base, logical, &mut map).unwrap();
            assert_eq!(visual, p);
        }
    }
}

#[test]
fn test_position_map_too_short() {
    let resolver = BidiResolver::new();
    let mut map = [PositionEntry::default(); 2];
    assert_eq!(resolver.logical_pos(b"abc", BaseDirection::Ltr, 0, &mut map), None);
}

// ============================================================================
// BRACKET STACK TESTS
// ============================================================================

#[test]
fn test_bracket_stack_reusable() {
    let resolver = BidiResolver::new();
    let mut stack = BracketStack::new();
    assert!(stack.is_empty());
    assert_eq!(BRACKET_DEPTH, 4);

    let text = format!("a({ALEF}");
    let mut out = vec![0u8; text.len()];
    resolver.resolve_paragraph(text.as_bytes(), BaseDirection::Ltr, Some(&mut out), None, &mut stack);

    // A stack left over from another paragraph does not leak into the next
    let mut out = [0u8; 5];
    resolver.resolve_paragraph(b"(a)bc", BaseDirection::Ltr, Some(&mut out), None, &mut stack);
    assert_eq!(&out, b"(a)bc");
}
