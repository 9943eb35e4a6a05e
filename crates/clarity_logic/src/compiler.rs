//! Expression Compiler
//!
//! Turns each proposition's formal expression into clauses over a shared
//! [`VariableTable`]. Translation follows a strict fallback chain, each step
//! tried only when the previous one cannot produce output:
//!
//! 1. **Empty**: no expression; the proposition id itself is asserted.
//! 2. **Structured**: parse into a [`Formula`], convert to CNF, and guard
//!    every clause with the proposition's assertion variable.
//! 3. **Pattern-matched**: find the dominant operator by substring search
//!    (negation, conjunction, disjunction, implication) and emit a clause
//!    shaped like it over synthetic part variables.
//! 4. **Atomic**: the whole expression becomes one variable.
//!
//! Every proposition ends with a *primary* variable that relationship
//! constraints refer to.

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use log::{debug, trace, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};

use clarity_graph::Proposition;

use crate::cnf::{to_cnf, Clause, Literal, VarId, VarKey, VariableTable};
use crate::config::CompilerConfig;
use crate::error::Result;
use crate::formula::OperatorFamily;
use crate::parser::parse;

/// Operator found by the pattern-matching fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternOperator {
    Negation,
    Conjunction,
    Disjunction,
    Implication,
}

impl PatternOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternOperator::Negation => "negation",
            PatternOperator::Conjunction => "conjunction",
            PatternOperator::Disjunction => "disjunction",
            PatternOperator::Implication => "implication",
        }
    }

    fn family(&self) -> Option<OperatorFamily> {
        match self {
            PatternOperator::Negation => None,
            PatternOperator::Conjunction => Some(OperatorFamily::Conjunction),
            PatternOperator::Disjunction => Some(OperatorFamily::Disjunction),
            PatternOperator::Implication => Some(OperatorFamily::Implication),
        }
    }
}

/// Which step of the fallback chain translated a proposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationPath {
    Empty,
    Structured,
    PatternMatched(PatternOperator),
    Atomic,
}

impl TranslationPath {
    /// Whether the translation captures the full logical structure.
    pub fn is_precise(&self) -> bool {
        matches!(self, TranslationPath::Empty | TranslationPath::Structured)
    }
}

/// The clauses contributed by one proposition.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledProposition {
    pub id: String,
    /// The variable relationship constraints use for this proposition.
    pub primary: VarId,
    /// Never empty.
    pub clauses: Vec<Clause>,
    pub path: TranslationPath,
    /// Operator families present, for proof translation notes.
    pub families: BTreeSet<OperatorFamily>,
}

/// Substrings that mark an expression as having logical structure.
const OPERATOR_MARKERS: &[&str] = &[
    "∧", "∨", "→", "↔", "¬", "⇒", "AND", "OR", "NOT", "&", "|", "~", "->", "=>", ">>",
];

struct OperatorSplitter {
    conjunction: Regex,
    disjunction: Regex,
    implication: Regex,
}

impl OperatorSplitter {
    fn new() -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            conjunction: Regex::new(r"∧|&&?|\s+AND\s+")?,
            disjunction: Regex::new(r"∨|\|\|?|\s+OR\s+")?,
            implication: Regex::new(r"→|⇒|->|=>|>>")?,
        })
    }
}

fn splitter() -> Option<&'static OperatorSplitter> {
    static SPLITTER: OnceLock<Option<OperatorSplitter>> = OnceLock::new();
    SPLITTER
        .get_or_init(|| match OperatorSplitter::new() {
            Ok(s) => Some(s),
            Err(e) => {
                warn!("Pattern splitter unavailable: {}", e);
                None
            }
        })
        .as_ref()
}

/// Compiles propositions for one consistency check.
///
/// Holds the variable table for the run; construct a new compiler for every
/// independent check.
#[derive(Debug)]
pub struct ExpressionCompiler {
    config: CompilerConfig,
    vars: VariableTable,
    primaries: HashMap<String, VarId>,
    unresolved: usize,
}

impl ExpressionCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            config,
            vars: VariableTable::new(),
            primaries: HashMap::new(),
            unresolved: 0,
        }
    }

    /// Compiles one proposition, recording its primary variable.
    pub fn compile(&mut self, prop: &Proposition) -> CompiledProposition {
        let id = prop.id.as_str();
        let compiled = match prop.expression() {
            None => self.compile_empty(id),
            Some(expr) => match self.compile_structured(id, expr) {
                Ok(compiled) => compiled,
                Err(e) => {
                    warn!(
                        "Structured translation of {} failed ({}), falling back to pattern matching",
                        id, e
                    );
                    self.compile_pattern(id, expr)
                }
            },
        };

        debug!(
            "Compiled {} via {:?}: {} clauses",
            id,
            compiled.path,
            compiled.clauses.len()
        );
        for clause in &compiled.clauses {
            trace!("  {}", self.render(clause));
        }

        self.primaries.insert(id.to_string(), compiled.primary);
        compiled
    }

    /// The primary variable of a compiled proposition.
    pub fn primary_of(&self, id: &str) -> Option<VarId> {
        self.primaries.get(id).copied()
    }

    /// The primary variable of `id`, or a fresh unconnected variable for an
    /// id that was never compiled. Each unknown reference gets its own.
    pub fn resolve(&mut self, id: &str) -> VarId {
        match self.primary_of(id) {
            Some(var) => var,
            None => {
                trace!("No proposition {}, allocating a free variable", id);
                self.unresolved += 1;
                self.vars.intern(VarKey::Unresolved {
                    id: id.to_string(),
                    occurrence: self.unresolved,
                })
            }
        }
    }

    pub fn variables(&self) -> &VariableTable {
        &self.vars
    }

    /// Renders a clause with variable names, e.g. `[¬a, a_p]`.
    pub fn render(&self, clause: &Clause) -> String {
        let parts: Vec<String> = clause
            .literals()
            .iter()
            .map(|l| self.vars.describe(*l))
            .collect();
        format!("[{}]", parts.join(", "))
    }

    fn compile_empty(&mut self, id: &str) -> CompiledProposition {
        let var = self.vars.intern(VarKey::Assertion(id.to_string()));
        CompiledProposition {
            id: id.to_string(),
            primary: var,
            clauses: vec![Clause::unit(Literal::positive(var))],
            path: TranslationPath::Empty,
            families: BTreeSet::new(),
        }
    }

    fn compile_structured(&mut self, id: &str, expr: &str) -> Result<CompiledProposition> {
        let formula = parse(expr)?;
        let assertion = self.vars.intern(VarKey::Assertion(id.to_string()));

        let scope = if self.config.share_atoms {
            None
        } else {
            Some(id.to_string())
        };
        let vars = &mut self.vars;
        let structure = to_cnf(&formula, self.config.max_cnf_clauses, |leaf| {
            vars.intern(VarKey::Atom {
                scope: scope.clone(),
                text: leaf.leaf_text().unwrap_or_default(),
            })
        })?;

        Ok(CompiledProposition {
            id: id.to_string(),
            primary: assertion,
            clauses: link(assertion, structure),
            path: TranslationPath::Structured,
            families: formula.families(),
        })
    }

    fn compile_pattern(&mut self, id: &str, expr: &str) -> CompiledProposition {
        let expr = expr.trim();
        if !OPERATOR_MARKERS.iter().any(|m| expr.contains(m)) {
            return self.compile_atomic(id, expr);
        }
        let Some(splitter) = splitter() else {
            return self.compile_atomic(id, expr);
        };
        // numbered before the parts so it leads every rendered clause
        self.vars.intern(VarKey::Assertion(id.to_string()));

        if let Some(inner) = negated_operand(expr) {
            let inner = if inner.is_empty() { id } else { inner };
            let var = self.part(id, format!("neg_{}", inner));
            return self.pattern_result(
                id,
                PatternOperator::Negation,
                None,
                vec![Clause::unit(Literal::negative(var))],
            );
        }

        if splitter.conjunction.is_match(expr) {
            let n = splitter.conjunction.split(expr).count();
            let structure = (0..n)
                .map(|i| Clause::unit(Literal::positive(self.part(id, format!("part{}", i)))))
                .collect();
            return self.pattern_result(id, PatternOperator::Conjunction, None, structure);
        }

        if splitter.disjunction.is_match(expr) {
            let n = splitter.disjunction.split(expr).count();
            let clause = Clause::new(
                (0..n)
                    .map(|i| Literal::positive(self.part(id, format!("part{}", i))))
                    .collect::<Vec<_>>(),
            );
            return self.pattern_result(id, PatternOperator::Disjunction, None, vec![clause]);
        }

        if splitter.implication.splitn(expr, 2).count() == 2 {
            let antecedent = self.part(id, "ant".to_string());
            let consequent = self.part(id, "cons".to_string());
            return self.pattern_result(
                id,
                PatternOperator::Implication,
                Some(antecedent),
                vec![Clause::new([
                    Literal::negative(antecedent),
                    Literal::positive(consequent),
                ])],
            );
        }

        self.compile_atomic(id, expr)
    }

    fn compile_atomic(&mut self, id: &str, expr: &str) -> CompiledProposition {
        let scope = if self.config.share_atoms {
            None
        } else {
            Some(id.to_string())
        };
        let var = self.vars.intern(VarKey::Atom {
            scope,
            text: expr.to_string(),
        });
        CompiledProposition {
            id: id.to_string(),
            primary: var,
            clauses: vec![Clause::unit(Literal::positive(var))],
            path: TranslationPath::Atomic,
            families: BTreeSet::new(),
        }
    }

    /// Links pattern structure to the assertion variable. Implications use
    /// their antecedent as primary.
    fn pattern_result(
        &mut self,
        id: &str,
        operator: PatternOperator,
        primary: Option<VarId>,
        structure: Vec<Clause>,
    ) -> CompiledProposition {
        let assertion = self.vars.intern(VarKey::Assertion(id.to_string()));
        CompiledProposition {
            id: id.to_string(),
            primary: primary.unwrap_or(assertion),
            clauses: link(assertion, structure),
            path: TranslationPath::PatternMatched(operator),
            families: operator.family().into_iter().collect(),
        }
    }

    fn part(&mut self, id: &str, label: String) -> VarId {
        self.vars.intern(VarKey::Part {
            prop: id.to_string(),
            label,
        })
    }
}

/// `[A]` plus `¬A ∨ c` for every structural clause `c`.
fn link(assertion: VarId, structure: Vec<Clause>) -> Vec<Clause> {
    let guard = Literal::negative(assertion);
    std::iter::once(Clause::unit(Literal::positive(assertion)))
        .chain(
            structure
                .iter()
                .map(|c| c.guarded_by(guard))
                .filter(|c| !c.is_tautology()),
        )
        .collect()
}

/// The operand of a leading negation, if the expression starts with one.
fn negated_operand(expr: &str) -> Option<&str> {
    ["¬", "~", "NOT "]
        .iter()
        .find_map(|prefix| expr.strip_prefix(prefix))
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(expr: &str) -> (CompiledProposition, ExpressionCompiler) {
        let mut compiler = ExpressionCompiler::new(CompilerConfig::default());
        let compiled = compiler.compile(&Proposition::new("p1", "statement").with_expression(expr));
        (compiled, compiler)
    }

    fn rendered(compiled: &CompiledProposition, compiler: &ExpressionCompiler) -> Vec<String> {
        compiled.clauses.iter().map(|c| compiler.render(c)).collect()
    }

    #[test]
    fn test_empty_expression_asserts_id() {
        let (compiled, compiler) = compile("   ");
        assert_eq!(compiled.path, TranslationPath::Empty);
        assert_eq!(rendered(&compiled, &compiler), vec!["[p1]"]);
    }

    #[test]
    fn test_structured_links_assertion() {
        let (compiled, compiler) = compile("p → q");
        assert_eq!(compiled.path, TranslationPath::Structured);
        assert_eq!(rendered(&compiled, &compiler), vec!["[p1]", "[¬p1, ¬p1_p, p1_q]"]);
        assert_eq!(
            compiler.variables().key(compiled.primary),
            Some(&VarKey::Assertion("p1".into()))
        );
        assert!(compiled.families.contains(&OperatorFamily::Implication));
    }

    #[test]
    fn test_predicates_become_scoped_variables() {
        let (compiled, compiler) = compile("likes(me, milk) ∧ x ≥ 3");
        assert_eq!(
            rendered(&compiled, &compiler),
            vec!["[p1]", "[¬p1, p1_likes(me, milk)]", "[¬p1, p1_x ≥ 3]"]
        );
    }

    #[test]
    fn test_atoms_are_scoped_per_proposition() {
        let mut compiler = ExpressionCompiler::new(CompilerConfig::default());
        let a = compiler.compile(&Proposition::new("a", "").with_expression("p"));
        let b = compiler.compile(&Proposition::new("b", "").with_expression("p"));
        assert_ne!(a.clauses[1], b.clauses[1]);
        for scope in ["a", "b"] {
            let key = VarKey::Atom {
                scope: Some(scope.into()),
                text: "p".into(),
            };
            assert!(compiler.variables().get(&key).is_some());
        }
    }

    #[test]
    fn test_shared_atoms_alias() {
        let mut compiler = ExpressionCompiler::new(CompilerConfig {
            share_atoms: true,
            ..CompilerConfig::default()
        });
        compiler.compile(&Proposition::new("a", "").with_expression("p"));
        compiler.compile(&Proposition::new("b", "").with_expression("¬p"));
        let shared = VarKey::Atom {
            scope: None,
            text: "p".into(),
        };
        assert!(compiler.variables().get(&shared).is_some());
        // two assertions plus one shared atom
        assert_eq!(compiler.variables().len(), 3);
    }

    #[test]
    fn test_pattern_fallback_conjunction() {
        // the quantifier defeats the structured parser
        let (compiled, compiler) = compile("∀x human(x) ∧ mortal(x) ∧ wise(x)");
        assert_eq!(
            compiled.path,
            TranslationPath::PatternMatched(PatternOperator::Conjunction)
        );
        assert_eq!(
            rendered(&compiled, &compiler),
            vec!["[p1]", "[¬p1, p1_part0]", "[¬p1, p1_part1]", "[¬p1, p1_part2]"]
        );
    }

    #[test]
    fn test_pattern_fallback_disjunction() {
        let (compiled, compiler) = compile("∃x a(x) ∨ b(x)");
        assert_eq!(
            compiled.path,
            TranslationPath::PatternMatched(PatternOperator::Disjunction)
        );
        assert_eq!(
            rendered(&compiled, &compiler),
            vec!["[p1]", "[¬p1, p1_part0, p1_part1]"]
        );
    }

    #[test]
    fn test_pattern_fallback_implication_uses_antecedent() {
        let (compiled, compiler) = compile("∀x (human(x) → mortal(x))");
        assert_eq!(
            compiled.path,
            TranslationPath::PatternMatched(PatternOperator::Implication)
        );
        assert_eq!(
            compiler.variables().key(compiled.primary),
            Some(&VarKey::Part {
                prop: "p1".into(),
                label: "ant".into()
            })
        );
        assert_eq!(
            rendered(&compiled, &compiler),
            vec!["[p1]", "[¬p1, ¬p1_ant, p1_cons]"]
        );
    }

    #[test]
    fn test_pattern_fallback_negation() {
        let (compiled, compiler) = compile("¬∃x unicorn(x)");
        assert_eq!(
            compiled.path,
            TranslationPath::PatternMatched(PatternOperator::Negation)
        );
        assert_eq!(
            rendered(&compiled, &compiler),
            vec!["[p1]", "[¬p1, ¬p1_neg_∃x unicorn(x)]"]
        );
    }

    #[test]
    fn test_atomic_fallback() {
        let (compiled, compiler) = compile("x + y = z");
        assert_eq!(compiled.path, TranslationPath::Atomic);
        assert_eq!(rendered(&compiled, &compiler), vec!["[p1_x + y = z]"]);
    }

    #[test]
    fn test_cnf_budget_falls_back() {
        let mut compiler = ExpressionCompiler::new(CompilerConfig {
            max_cnf_clauses: 2,
            ..CompilerConfig::default()
        });
        let compiled = compiler
            .compile(&Proposition::new("p1", "").with_expression("(a ∧ b) ∨ (c ∧ d)"));
        assert_eq!(
            compiled.path,
            TranslationPath::PatternMatched(PatternOperator::Conjunction)
        );
    }

    #[test]
    fn test_long_conjunction_chain_falls_back_to_pattern() {
        let expr = (0..5000)
            .map(|i| format!("a{}", i))
            .collect::<Vec<_>>()
            .join(" ∧ ");
        let (compiled, _) = compile(&expr);
        assert_eq!(
            compiled.path,
            TranslationPath::PatternMatched(PatternOperator::Conjunction)
        );
        // the assertion plus one guarded unit per conjunct
        assert_eq!(compiled.clauses.len(), 5001);
    }

    #[test]
    fn test_resolve_unknown_id_allocates_free_variable() {
        let mut compiler = ExpressionCompiler::new(CompilerConfig::default());
        let known = compiler.compile(&Proposition::new("a", ""));
        assert_eq!(compiler.resolve("a"), known.primary);
        let ghost = compiler.resolve("ghost");
        assert_ne!(ghost, known.primary);
        assert_ne!(compiler.resolve("ghost"), ghost);
        assert_eq!(compiler.variables().len(), 3);
    }
}
