use bevy_math::{Vec2, Vec3};
use bevy_reflect::Reflect;
use serde::{Deserialize, Serialize};

/// The type of value a port carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
#[reflect(Debug, PartialEq, Hash)]
pub enum AttributeType {
    /// A single `f32`.
    Float,
    /// A boolean.
    Bool,
    /// A 2D vector.
    Vec2,
    /// A 3D vector.
    Vec3,
}

impl AttributeType {
    /// Returns `true` if an output of type `source` may feed an input of this
    /// type.
    ///
    /// Booleans widen to floats and 2D vectors widen to 3D vectors with a zero
    /// `z`.
    pub fn accepts(self, source: AttributeType) -> bool {
        matches!(
            (self, source),
            (AttributeType::Float, AttributeType::Float | AttributeType::Bool)
                | (AttributeType::Bool, AttributeType::Bool)
                | (AttributeType::Vec2, AttributeType::Vec2)
                | (AttributeType::Vec3, AttributeType::Vec2 | AttributeType::Vec3)
        )
    }
}

/// A value flowing through the graph.
#[derive(Clone, Copy, Debug, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Debug, PartialEq)]
pub enum AttributeValue {
    /// A single `f32`.
    Float(f32),
    /// A boolean.
    Bool(bool),
    /// A 2D vector.
    Vec2(Vec2),
    /// A 3D vector.
    Vec3(Vec3),
}

impl AttributeValue {
    /// The type of this value.
    pub fn value_type(&self) -> AttributeType {
        match self {
            AttributeValue::Float(_) => AttributeType::Float,
            AttributeValue::Bool(_) => AttributeType::Bool,
            AttributeValue::Vec2(_) => AttributeType::Vec2,
            AttributeValue::Vec3(_) => AttributeType::Vec3,
        }
    }

    /// Reads this value as a finite 3D vector.
    ///
    /// Returns `None` for non-vector values and for vectors with NaN or
    /// infinite components.
    pub fn as_vec3(&self) -> Option<Vec3> {
        let vector = match *self {
            AttributeValue::Vec2(value) => value.extend(0.0),
            AttributeValue::Vec3(value) => value,
            AttributeValue::Float(_) | AttributeValue::Bool(_) => return None,
        };
        vector.is_finite().then_some(vector)
    }

    /// Reads this value as a finite float. `true` reads as `1.0`.
    pub fn as_float(&self) -> Option<f32> {
        match *self {
            AttributeValue::Float(value) => value.is_finite().then_some(value),
            AttributeValue::Bool(value) => Some(if value { 1.0 } else { 0.0 }),
            AttributeValue::Vec2(_) | AttributeValue::Vec3(_) => None,
        }
    }

    /// Converts this value so it fits a port of type `target`, following the
    /// widening rules of [`AttributeType::accepts`].
    pub fn convert_to(&self, target: AttributeType) -> Option<AttributeValue> {
        if !target.accepts(self.value_type()) {
            return None;
        }
        match target {
            AttributeType::Float => self.as_float().map(AttributeValue::Float),
            AttributeType::Vec3 => self.as_vec3().map(AttributeValue::Vec3),
            AttributeType::Bool | AttributeType::Vec2 => Some(*self),
        }
    }
}

impl From<f32> for AttributeValue {
    fn from(value: f32) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<Vec2> for AttributeValue {
    fn from(value: Vec2) -> Self {
        AttributeValue::Vec2(value)
    }
}

impl From<Vec3> for AttributeValue {
    fn from(value: Vec3) -> Self {
        AttributeValue::Vec3(value)
    }
}
