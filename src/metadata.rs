use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// One node of a project's metadata document.
///
/// Documents are irregular: the same field can hold a scalar in one project
/// and a sequence in another, so traversal always dispatches on the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Node {
    Mapping(BTreeMap<String, Node>),
    Sequence(Vec<Node>),
    Scalar(Scalar),
}

impl Node {
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Mapping(entries) => entries.get(key),
            _ => None,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Node::as_scalar).and_then(Scalar::as_str)
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(entries) => Node::Mapping(
                entries
                    .into_iter()
                    .map(|(key, child)| (key, Node::from(child)))
                    .collect(),
            ),
            Value::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Null => Node::Scalar(Scalar::Null),
            Value::Bool(flag) => Node::Scalar(Scalar::Bool(flag)),
            Value::Number(number) => Node::Scalar(Scalar::Number(number)),
            Value::String(text) => Node::Scalar(Scalar::String(text)),
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        match node {
            Node::Mapping(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(key, child)| (key, Value::from(child)))
                    .collect(),
            ),
            Node::Sequence(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Node::Scalar(scalar) => Value::from(scalar),
        }
    }
}

impl From<Scalar> for Node {
    fn from(scalar: Scalar) -> Self {
        Node::Scalar(scalar)
    }
}

/// A leaf value. Numbers compare numerically, so `1` and `1.0` are equal,
/// but a boolean never equals a number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Scalar {
    /// Reads command-line text as a JSON scalar when it is one (`42`,
    /// `true`, `null`, `"quoted"`), otherwise keeps it as a plain string.
    pub fn parse_lenient(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Scalar::try_from(value).unwrap_or_else(|_| Scalar::String(text.to_string())),
            Err(_) => Scalar::String(text.to_string()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    fn rank(&self) -> u8 {
        match self {
            Scalar::Null => 0,
            Scalar::Bool(_) => 1,
            Scalar::Number(_) => 2,
            Scalar::String(_) => 3,
        }
    }
}

/// A JSON number as compared by [`Scalar`]: integers stay exact, floats
/// are compared against them by mathematical value.
#[derive(Debug, Clone, Copy)]
enum Numeric {
    Int(i128),
    Float(f64),
}

impl Numeric {
    fn of(number: &Number) -> Self {
        if let Some(value) = number.as_i64() {
            return Numeric::Int(value.into());
        }
        if let Some(value) = number.as_u64() {
            return Numeric::Int(value.into());
        }
        let value = number.as_f64().unwrap_or(0.0);
        // folds -0.0 into 0.0
        Numeric::Float(if value == 0.0 { 0.0 } else { value })
    }

    /// The integer a float is exactly equal to, if any.
    fn integral(value: f64) -> Option<i128> {
        let in_range = value >= -(2f64.powi(127)) && value < 2f64.powi(127);
        (value.fract() == 0.0 && in_range).then_some(value as i128)
    }
}

fn cmp_int_float(int: i128, float: f64) -> Ordering {
    let floor = float.floor();
    if floor >= 2f64.powi(127) {
        return Ordering::Less;
    }
    if floor < -(2f64.powi(127)) {
        return Ordering::Greater;
    }
    match int.cmp(&(floor as i128)) {
        Ordering::Equal if float > floor => Ordering::Less,
        ordering => ordering,
    }
}

impl Ord for Numeric {
    fn cmp(&self, other: &Self) -> Ordering {
        match (*self, *other) {
            (Numeric::Int(left), Numeric::Int(right)) => left.cmp(&right),
            (Numeric::Float(left), Numeric::Float(right)) => left.total_cmp(&right),
            (Numeric::Int(left), Numeric::Float(right)) => cmp_int_float(left, right),
            (Numeric::Float(left), Numeric::Int(right)) => cmp_int_float(right, left).reverse(),
        }
    }
}

impl PartialOrd for Numeric {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Numeric {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Numeric {}

impl Hash for Numeric {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match *self {
            Numeric::Int(value) => value.hash(state),
            Numeric::Float(value) => match Numeric::integral(value) {
                Some(int) => int.hash(state),
                None => value.to_bits().hash(state),
            },
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => true,
            (Scalar::Bool(left), Scalar::Bool(right)) => left == right,
            (Scalar::Number(left), Scalar::Number(right)) => Numeric::of(left) == Numeric::of(right),
            (Scalar::String(left), Scalar::String(right)) => left == right,
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Scalar::Bool(left), Scalar::Bool(right)) => left.cmp(right),
            (Scalar::Number(left), Scalar::Number(right)) => {
                Numeric::of(left).cmp(&Numeric::of(right))
            }
            (Scalar::String(left), Scalar::String(right)) => left.cmp(right),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Scalar::Null => {}
            Scalar::Bool(flag) => flag.hash(state),
            Scalar::Number(number) => Numeric::of(number).hash(state),
            Scalar::String(text) => text.hash(state),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(flag) => write!(f, "{flag}"),
            Scalar::Number(number) => write!(f, "{number}"),
            Scalar::String(text) => write!(f, "{text}"),
        }
    }
}

impl TryFrom<Value> for Scalar {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Scalar::Null),
            Value::Bool(flag) => Ok(Scalar::Bool(flag)),
            Value::Number(number) => Ok(Scalar::Number(number)),
            Value::String(text) => Ok(Scalar::String(text)),
            Value::Array(_) => Err("expected a scalar, found a list".to_string()),
            Value::Object(_) => Err("expected a scalar, found an object".to_string()),
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Null => Value::Null,
            Scalar::Bool(flag) => Value::Bool(flag),
            Scalar::Number(number) => Value::Number(number),
            Scalar::String(text) => Value::String(text),
        }
    }
}

impl From<&str> for Scalar {
    fn from(text: &str) -> Self {
        Scalar::String(text.to_string())
    }
}

impl From<String> for Scalar {
    fn from(text: String) -> Self {
        Scalar::String(text)
    }
}

impl From<bool> for Scalar {
    fn from(flag: bool) -> Self {
        Scalar::Bool(flag)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(Number::from(value))
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Scalar::Number(Number::from(value))
    }
}
