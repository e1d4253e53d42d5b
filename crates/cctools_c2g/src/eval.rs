use crate::{Node, NodeKind, Operator};
use ahash::AHashMap;
use log::warn;

/// Variables of a running script. Names are case insensitive, and unknown variables read as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    values: AHashMap<String, u32>,
}

/// Flags and values predefined by the game engine.
const ENGINE_CONSTANTS: [(&str, u32); 8] = [
    ("male", 0x16),
    ("female", 0x56),
    ("continue", 0x1),
    ("replay", 0x2),
    ("silent", 0x4),
    ("ktools", 0x8),
    ("ktime", 0x10),
    ("no_bonus", 0x400),
];

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table holding the constants the game engine defines.
    pub fn with_engine_constants() -> Self {
        let mut table = Self::new();
        for (name, value) in ENGINE_CONSTANTS {
            table.set(name, value);
        }
        table
    }

    pub fn get(&self, name: &str) -> u32 {
        self.values
            .get(&name.to_ascii_lowercase())
            .copied()
            .unwrap_or(0)
    }

    pub fn set(&mut self, name: &str, value: u32) {
        self.values.insert(name.to_ascii_lowercase(), value);
    }

    /// Evaluates an expression. Errors (division by zero, assignments inside expressions, or
    /// non-expression nodes) are logged, and evaluate to 0.
    pub fn evaluate(&self, node: &Node) -> u32 {
        match &node.kind {
            NodeKind::Number(value) => *value,
            NodeKind::Identifier(name) => self.get(name),
            NodeKind::Operator { op, operands } => {
                let left = self.evaluate(&operands[0]);
                let right = self.evaluate(&operands[1]);
                self.apply(node.line, *op, left, right)
            }
            _ => {
                warn!("Line {}: `{node}` is not an expression", node.line);
                0
            }
        }
    }

    fn apply(&self, line: usize, op: Operator, left: u32, right: u32) -> u32 {
        let truth = |value: bool| value as u32;
        match op {
            Operator::Less => truth(left < right),
            Operator::LessEqual => truth(left <= right),
            Operator::Greater => truth(left > right),
            Operator::GreaterEqual => truth(left >= right),
            Operator::Equal => truth(left == right),
            Operator::NotEqual => truth(left != right),
            Operator::Multiply => left.wrapping_mul(right),
            Operator::Add => left.wrapping_add(right),
            Operator::Subtract => left.wrapping_sub(right),
            Operator::Divide | Operator::Modulo if right == 0 => {
                warn!("Line {line}: division by zero");
                0
            }
            Operator::Divide => left / right,
            Operator::Modulo => left % right,
            Operator::Xor => left ^ right,
            Operator::BitAnd => left & right,
            Operator::BitOr => left | right,
            Operator::LogicalAnd => truth(left != 0 && right != 0),
            Operator::LogicalOr => truth(left != 0 || right != 0),
            Operator::Assign => {
                warn!("Line {line}: unexpected `=` inside of an expression");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameScript;

    fn evaluate(table: &SymbolTable, source: &str) -> u32 {
        let script = GameScript::parse_str(source);
        assert_eq!(script.nodes.len(), 1, "`{source}` should be a single expression");
        table.evaluate(&script.nodes[0])
    }

    #[test]
    fn arithmetic() {
        let table = SymbolTable::new();
        assert_eq!(evaluate(&table, "5 3 +"), 8);
        assert_eq!(evaluate(&table, "2 3 + 4 *"), 20);
        assert_eq!(evaluate(&table, "3 4 ^"), 7);
        assert_eq!(evaluate(&table, "12 10 &"), 8);
        assert_eq!(evaluate(&table, "12 3 |"), 15);
    }

    #[test]
    fn operands_are_reversed() {
        let table = SymbolTable::new();
        // `a b -` computes `b - a`
        assert_eq!(evaluate(&table, "2 10 -"), 8);
        assert_eq!(evaluate(&table, "10 2 -"), 2u32.wrapping_sub(10));
        assert_eq!(evaluate(&table, "2 10 /"), 5);
        assert_eq!(evaluate(&table, "3 10 %"), 1);
        assert_eq!(evaluate(&table, "1 2 <"), 0);
        assert_eq!(evaluate(&table, "2 1 <"), 1);
        assert_eq!(evaluate(&table, "2 2 >="), 1);
    }

    #[test]
    fn division_by_zero_is_zero() {
        let table = SymbolTable::new();
        assert_eq!(evaluate(&table, "0 5 /"), 0);
        assert_eq!(evaluate(&table, "0 5 %"), 0);
    }

    #[test]
    fn logical_operators() {
        let table = SymbolTable::new();
        assert_eq!(evaluate(&table, "7 3 &&"), 1);
        assert_eq!(evaluate(&table, "0 3 &&"), 0);
        assert_eq!(evaluate(&table, "0 3 ||"), 1);
        assert_eq!(evaluate(&table, "0 0 ||"), 0);
        assert_eq!(evaluate(&table, "4 4 =="), 1);
        assert_eq!(evaluate(&table, "4 4 !="), 0);
    }

    #[test]
    fn symbols() {
        let mut table = SymbolTable::with_engine_constants();
        assert_eq!(table.get("MALE"), 0x16);
        assert_eq!(table.get("no_bonus"), 0x400);
        assert_eq!(table.get("never_set"), 0);

        table.set("Level", 4);
        assert_eq!(evaluate(&table, "1 level +"), 5);
        assert_eq!(evaluate(&table, "ktools ktime |"), 0x18);
    }

    #[test]
    fn non_expressions_are_zero() {
        let table = SymbolTable::new();
        assert_eq!(evaluate(&table, "\"text\""), 0);
        assert_eq!(evaluate(&table, "#label"), 0);
        assert_eq!(evaluate(&table, "1 x ="), 0);
        // Commands count as 0 within an expression
        assert_eq!(evaluate(&table, "map 1 +"), 1);
    }
}
