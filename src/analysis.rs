//! # Dependency Analysis
//!
//! Walks a parsed description and reports every piece of game data a
//! renderer would need to fetch before it can display the tooltip. Nothing
//! is resolved here; the report contains ids and names only.
//!
//! Game semantics of token text (which prefix means an aura check, which
//! letter runs are player stats) live in this module, keeping the lexer and
//! parser free of them.
//!
//! ## Example
//!
//! ```rust
//! use spelldesc_parser::{analyze, parse};
//!
//! let result = parse("$?a410673[Deals $424509s1 damage.][Nothing.]");
//! let deps = analyze(&result.root);
//! assert!(deps.aura_checks.contains(&410673));
//! assert!(deps.spell_ids.contains(&424509));
//! ```

use crate::cst::{
    BranchContent, ConditionPredicate, Description, Expression, ExpressionBlock, PredicateAtom,
    Segment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Letter runs that name player stats rather than spell effect values.
const PLAYER_STATS: &[&str] = &[
    "SP", "sp", "AP", "ap", "RAP", "MHP", "mhp", "SPS", "PL", "pl", "INT",
];

// =============================================================================
// DEPENDENCIES
// =============================================================================

/// Everything a description references outside its own spell.
///
/// Sets are ordered so reports serialize deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependencies {
    /// Spells referenced for their values or names.
    pub spell_ids: BTreeSet<u32>,
    /// Aura ids tested by `a<id>` conditions.
    pub aura_checks: BTreeSet<u32>,
    /// Spell ids tested by `s<id>` (spell known) conditions.
    pub spell_known_checks: BTreeSet<u32>,
    /// Class ids tested by `c<id>` / `pc<id>` conditions.
    pub class_checks: BTreeSet<u32>,
    /// Names referenced through `$<name>` custom variables.
    pub custom_variables: BTreeSet<String>,
    /// Player stats referenced, normalized to upper case.
    pub player_stats: BTreeSet<String>,
    /// Descriptions embedded through `$@spelldesc<id>`.
    pub embedded_descriptions: BTreeSet<u32>,
    /// Whether rendering needs the character's gender.
    pub needs_gender: bool,
}

impl Dependencies {
    /// Check if the description is self-contained.
    pub fn is_empty(&self) -> bool {
        self.spell_ids.is_empty()
            && self.aura_checks.is_empty()
            && self.spell_known_checks.is_empty()
            && self.class_checks.is_empty()
            && self.custom_variables.is_empty()
            && self.player_stats.is_empty()
            && self.embedded_descriptions.is_empty()
            && !self.needs_gender
    }
}

/// Collect the dependencies of a parsed description.
pub fn analyze(description: &Description) -> Dependencies {
    let mut deps = Dependencies::default();
    for segment in &description.segments {
        walk_segment(segment, &mut deps);
    }
    deps
}

// =============================================================================
// TREE WALK
// =============================================================================

fn walk_segment(segment: &Segment, deps: &mut Dependencies) {
    match segment {
        Segment::CrossSpellRef(token) => record_cross_spell_ref(&token.text, deps),
        Segment::AtVariable(token) => record_at_variable(&token.text, deps),
        Segment::CustomVariable(token) => record_custom_variable(&token.text, deps),
        Segment::SimpleVariable(token) => record_simple_variable(&token.text, deps),
        Segment::Gender(_) => deps.needs_gender = true,
        Segment::ExpressionBlock(block) => walk_expression_block(block, deps),
        Segment::Conditional(cond) => {
            walk_predicate(&cond.predicate, deps);
            walk_branch(&cond.true_branch.content, deps);
            for tail in &cond.tail {
                match tail {
                    crate::cst::ConditionalTail::Chained(arm) => {
                        walk_predicate(&arm.predicate, deps);
                        walk_branch(&arm.branch.content, deps);
                    }
                    crate::cst::ConditionalTail::Else(branch) => {
                        walk_branch(&branch.content, deps);
                    }
                }
            }
        }
        Segment::Text(_)
        | Segment::Dollar(_)
        | Segment::Pluralization(_)
        | Segment::ColorCode(_)
        | Segment::Pipe(_)
        | Segment::LBracket(_)
        | Segment::RBracket(_) => {}
    }
}

fn walk_branch(content: &[BranchContent], deps: &mut Dependencies) {
    for item in content {
        match item {
            BranchContent::CrossSpellRef(token) => record_cross_spell_ref(&token.text, deps),
            BranchContent::AtVariable(token) => record_at_variable(&token.text, deps),
            BranchContent::CustomVariable(token) => record_custom_variable(&token.text, deps),
            BranchContent::SimpleVariable(token) => record_simple_variable(&token.text, deps),
            BranchContent::Gender(_) => deps.needs_gender = true,
            BranchContent::ExpressionBlock(block) => walk_expression_block(block, deps),
            BranchContent::NestedBrackets(group) => walk_branch(&group.content, deps),
            BranchContent::Conditional(cond) => {
                walk_predicate(&cond.predicate, deps);
                walk_branch(&cond.true_branch.content, deps);
                for tail in &cond.tail {
                    match tail {
                        crate::cst::NestedTail::Chained(arm) => {
                            walk_predicate(&arm.predicate, deps);
                            walk_branch(&arm.branch.content, deps);
                        }
                        crate::cst::NestedTail::Trailing(branch) => {
                            walk_branch(&branch.content, deps);
                        }
                    }
                }
            }
            BranchContent::Text(_)
            | BranchContent::Pluralization(_)
            | BranchContent::ColorCode(_)
            | BranchContent::Pipe(_) => {}
        }
    }
}

fn walk_predicate(predicate: &ConditionPredicate, deps: &mut Dependencies) {
    for atom in &predicate.conditions {
        match atom {
            PredicateAtom::CondType(token) => record_cond_type(&token.text, deps),
            // Function checks carry opaque engine arguments; nothing to fetch.
            PredicateAtom::FuncCall(_) => {}
        }
    }
}

fn walk_expression_block(block: &ExpressionBlock, deps: &mut Dependencies) {
    walk_expression(&block.expression, deps);
}

fn walk_expression(expression: &Expression, deps: &mut Dependencies) {
    match expression {
        Expression::Binary(binary) => {
            walk_expression(&binary.left, deps);
            walk_expression(&binary.right, deps);
        }
        Expression::Unary(unary) => walk_expression(&unary.operand, deps),
        Expression::Paren(paren) => walk_expression(&paren.expression, deps),
        Expression::DollarFunctionCall(call) | Expression::FunctionCall(call) => {
            for arg in &call.args {
                walk_expression(arg, deps);
            }
        }
        Expression::CrossSpellRef(token) => record_cross_spell_ref(&token.text, deps),
        Expression::AtVariable(token) => record_at_variable(&token.text, deps),
        Expression::CustomVariable(token) => record_custom_variable(&token.text, deps),
        Expression::SimpleVariable(token) => record_simple_variable(&token.text, deps),
        Expression::Number(_) => {}
    }
}

// =============================================================================
// TOKEN TEXT DECOMPOSITION
// =============================================================================

/// `$424509s1` contributes spell id 424509.
fn record_cross_spell_ref(text: &str, deps: &mut Dependencies) {
    if let Some(id) = leading_number(text.trim_start_matches('$')) {
        deps.spell_ids.insert(id);
    }
}

/// `$@spelldesc123` embeds another description; other `$@name123` forms
/// reference the spell for its name or icon.
fn record_at_variable(text: &str, deps: &mut Dependencies) {
    let body = text.trim_start_matches("$@");
    let name: String = body.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    let Some(id) = trailing_number(body) else {
        return;
    };
    if name == "spelldesc" {
        deps.embedded_descriptions.insert(id);
    } else {
        deps.spell_ids.insert(id);
    }
}

/// `$<mult>` contributes the custom variable name `mult`.
fn record_custom_variable(text: &str, deps: &mut Dependencies) {
    let name = text
        .trim_start_matches("$<")
        .trim_end_matches('>');
    if !name.is_empty() {
        deps.custom_variables.insert(name.to_string());
    }
}

/// `$SP`, `$ap` and the other stat forms contribute a player stat.
fn record_simple_variable(text: &str, deps: &mut Dependencies) {
    let body = text.trim_start_matches('$');
    if PLAYER_STATS.contains(&body) {
        deps.player_stats.insert(body.to_ascii_uppercase());
    }
}

/// `a410673` is an aura check, `s424509` a spell-known check, `c7` and
/// `pc999` class checks. Other prefixes need no external data.
fn record_cond_type(text: &str, deps: &mut Dependencies) {
    let prefix: String = text.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    let Some(id) = trailing_number(text) else {
        return;
    };
    match prefix.as_str() {
        "a" => {
            deps.aura_checks.insert(id);
        }
        "s" => {
            deps.spell_known_checks.insert(id);
        }
        "c" | "pc" => {
            deps.class_checks.insert(id);
        }
        _ => {}
    }
}

fn leading_number(s: &str) -> Option<u32> {
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn trailing_number(s: &str) -> Option<u32> {
    let digits: String = s
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits.parse().ok()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn analyze_source(source: &str) -> Dependencies {
        let result = parse(source);
        assert!(result.is_ok(), "errors for {source:?}");
        analyze(&result.root)
    }

    #[test]
    fn test_plain_text_has_no_dependencies() {
        assert!(analyze_source("Deals damage over time.").is_empty());
    }

    #[test]
    fn test_own_effect_variables_are_not_dependencies() {
        let deps = analyze_source("Deals $s1 damage over $d.");
        assert!(deps.is_empty());
    }

    #[test]
    fn test_cross_spell_reference() {
        let deps = analyze_source("Also deals $424509s1 extra damage.");
        assert!(deps.spell_ids.contains(&424509));
    }

    #[test]
    fn test_condition_checks() {
        let deps = analyze_source("$?a410673[x]?s424509[y]?c2[z][w]");
        assert!(deps.aura_checks.contains(&410673));
        assert!(deps.spell_known_checks.contains(&424509));
        assert!(deps.class_checks.contains(&2));
    }

    #[test]
    fn test_embedded_description() {
        let deps = analyze_source("$@spelldesc414684");
        assert!(deps.embedded_descriptions.contains(&414684));
        assert!(!deps.spell_ids.contains(&414684));
    }

    #[test]
    fn test_spell_name_reference() {
        let deps = analyze_source("Casts $@spellname755.");
        assert!(deps.spell_ids.contains(&755));
    }

    #[test]
    fn test_custom_variable_and_player_stat() {
        let deps = analyze_source("Gains ${$SP*$<mult>} bonus.");
        assert!(deps.player_stats.contains("SP"));
        assert!(deps.custom_variables.contains("mult"));
    }

    #[test]
    fn test_player_stat_case_normalized() {
        let deps = analyze_source("Restores $mhp health.");
        assert!(deps.player_stats.contains("MHP"));
    }

    #[test]
    fn test_gender_flag() {
        let deps = analyze_source("Empowers $ghim:her;.");
        assert!(deps.needs_gender);
    }

    #[test]
    fn test_nested_content_is_walked() {
        let deps = analyze_source("$?a1[outer $?a2[$424509s1][$<mult>]][${$AP/2}]");
        assert!(deps.aura_checks.contains(&1));
        assert!(deps.aura_checks.contains(&2));
        assert!(deps.spell_ids.contains(&424509));
        assert!(deps.custom_variables.contains("mult"));
        assert!(deps.player_stats.contains("AP"));
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let deps = analyze_source("$?a410673[x][y]");
        let json = serde_json::to_value(&deps).unwrap();
        assert_eq!(json["auraChecks"][0], 410673);
        assert_eq!(json["needsGender"], false);
    }
}
