use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{ast::types::Operator, lexer::tokens::TokenKind};

/// Relative precedence of binary operators, loosest first.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Assignment,
    Relational,
    Additive,
    Multiplicative,
    Index,
    Range,
    Member,
}

lazy_static! {
    pub static ref OPERATOR_LOOKUP: HashMap<TokenKind, Operator> = {
        let mut map = HashMap::new();
        map.insert(TokenKind::Plus, Operator::Add);
        map.insert(TokenKind::Dash, Operator::Subtract);
        map.insert(TokenKind::Star, Operator::Multiply);
        map.insert(TokenKind::Slash, Operator::Divide);
        map.insert(TokenKind::Percent, Operator::Modulo);

        map.insert(TokenKind::Equals, Operator::Equals);
        map.insert(TokenKind::NotEquals, Operator::NotEquals);
        map.insert(TokenKind::Less, Operator::Less);
        map.insert(TokenKind::LessEquals, Operator::LessEquals);
        map.insert(TokenKind::Greater, Operator::Greater);
        map.insert(TokenKind::GreaterEquals, Operator::GreaterEquals);

        map.insert(TokenKind::At, Operator::Index);
        map.insert(TokenKind::DotDot, Operator::Range);
        map.insert(TokenKind::Dot, Operator::Member);

        map.insert(TokenKind::PlusEquals, Operator::AddAssign);
        map.insert(TokenKind::MinusEquals, Operator::SubtractAssign);
        map.insert(TokenKind::StarEquals, Operator::MultiplyAssign);
        map.insert(TokenKind::SlashEquals, Operator::DivideAssign);
        map.insert(TokenKind::PercentEquals, Operator::ModuloAssign);
        map
    };
}

pub fn binding_power(operator: Operator) -> BindingPower {
    match operator {
        Operator::AddAssign
        | Operator::SubtractAssign
        | Operator::MultiplyAssign
        | Operator::DivideAssign
        | Operator::ModuloAssign => BindingPower::Assignment,
        Operator::Equals
        | Operator::NotEquals
        | Operator::Less
        | Operator::LessEquals
        | Operator::Greater
        | Operator::GreaterEquals => BindingPower::Relational,
        Operator::Add | Operator::Subtract => BindingPower::Additive,
        Operator::Multiply | Operator::Divide | Operator::Modulo => BindingPower::Multiplicative,
        Operator::Index => BindingPower::Index,
        Operator::Range => BindingPower::Range,
        Operator::Member => BindingPower::Member,
    }
}

/// Member access chains nest to the right and compound assignments never chain.
pub fn is_left_associative(operator: Operator) -> bool {
    !matches!(binding_power(operator), BindingPower::Assignment | BindingPower::Member)
}

/// Whether `parent OP (child ...)` has to be rotated into `(parent ...) child ...`.
pub fn rotates_over(parent: Operator, child: Operator) -> bool {
    let (parent_power, child_power) = (binding_power(parent), binding_power(child));
    parent_power > child_power || (parent_power == child_power && is_left_associative(parent))
}
