//! Relationship Constraint Compiler
//!
//! Each typed edge becomes at most one two-literal clause over the primary
//! variables of its endpoints:
//!
//! | relationship | clause |
//! |---|---|
//! | supports | `¬from ∨ to` |
//! | contradicts | `¬from ∨ ¬to` |
//! | depends_on | `¬to ∨ from` |
//! | attacks | `¬from ∨ ¬to` |
//! | assumes | `¬from ∨ to` |
//! | concludes_from, other | none |
//!
//! `strength` is informational and never changes the clause.

use clarity_graph::{RelationKind, Relationship};
use log::trace;

use crate::cnf::{Clause, Literal, VarId};
use crate::compiler::ExpressionCompiler;

/// The clause a relationship of `kind` contributes between `from` and `to`.
pub fn relationship_clause(kind: &RelationKind, from: VarId, to: VarId) -> Option<Clause> {
    let literals = match kind {
        RelationKind::Supports | RelationKind::Assumes => {
            [Literal::negative(from), Literal::positive(to)]
        }
        RelationKind::Contradicts | RelationKind::Attacks => {
            [Literal::negative(from), Literal::negative(to)]
        }
        RelationKind::DependsOn => [Literal::negative(to), Literal::positive(from)],
        RelationKind::ConcludesFrom | RelationKind::Other(_) => return None,
    };
    Some(Clause::new(literals))
}

/// Whether relationships of `kind` contribute a clause at all.
pub fn carries_clause(kind: &RelationKind) -> bool {
    !matches!(kind, RelationKind::ConcludesFrom | RelationKind::Other(_))
}

/// Compiles one relationship against the propositions compiled so far.
///
/// Unknown endpoints resolve to fresh free variables, so a dangling edge
/// still yields a clause but one that cannot constrain any proposition.
/// Returns `None` for kinds that carry no clause or whose clause is a
/// tautology (a `supports` self-loop).
pub fn compile_relationship(
    compiler: &mut ExpressionCompiler,
    relationship: &Relationship,
) -> Option<Clause> {
    if !carries_clause(&relationship.kind) {
        return None;
    }
    let from = compiler.resolve(&relationship.from_id);
    let to = compiler.resolve(&relationship.to_id);
    let clause = relationship_clause(&relationship.kind, from, to)?;
    if clause.is_tautology() {
        trace!("Relationship {} is a tautology, skipping", relationship.id);
        return None;
    }
    trace!(
        "Relationship {} ({}) -> {}",
        relationship.id,
        relationship.kind,
        compiler.render(&clause)
    );
    Some(clause)
}
