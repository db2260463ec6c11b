use std::fmt::Display;

/// A type as written in source, before any name resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeAnnotation {
    Int,
    Float,
    Bool,
    String,
    Void,
    /// `[T]`
    Array(Box<TypeAnnotation>),
    /// `(T, U, ...)`
    Tuple(Vec<TypeAnnotation>),
    /// `Name` or `struct Name`
    Named(String),
}

impl Display for TypeAnnotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Type::from(self))
    }
}

/// A resolved type.
///
/// Equality is structural: two arrays are equal when their element types are,
/// two function types when their parameter lists and return types are.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Int,
    Float,
    Bool,
    String,
    Void,
    Array(Box<Type>),
    Tuple(Vec<Type>),
    Struct(String, Vec<(String, Type)>),
    Function(Vec<Type>, Box<Type>),
    /// The type of anything whose type could not be determined. Never
    /// compared against, so one mistake yields one diagnostic.
    Unknown,
}

impl Type {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    /// Types a function may return and a runtime value may be coerced to
    /// without losing its shape.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Type::Int | Type::Float | Type::Bool)
    }

    pub fn is_unknown(&self) -> bool {
        match self {
            Type::Unknown => true,
            Type::Array(element) => element.is_unknown(),
            Type::Tuple(elements) => elements.iter().any(Type::is_unknown),
            Type::Function(parameters, return_type) => {
                parameters.iter().any(Type::is_unknown) || return_type.is_unknown()
            }
            _ => false,
        }
    }

    /// Structural equality, except that an unknown type matches everything.
    pub fn compatible_with(&self, other: &Type) -> bool {
        self.is_unknown() || other.is_unknown() || self == other
    }
}

/// Resolves an annotation without a struct table. Named types become field-less
/// structs, which is all the interpreter needs to tell them apart.
impl From<&TypeAnnotation> for Type {
    fn from(annotation: &TypeAnnotation) -> Self {
        match annotation {
            TypeAnnotation::Int => Type::Int,
            TypeAnnotation::Float => Type::Float,
            TypeAnnotation::Bool => Type::Bool,
            TypeAnnotation::String => Type::String,
            TypeAnnotation::Void => Type::Void,
            TypeAnnotation::Array(element) => Type::Array(Box::new(Type::from(element.as_ref()))),
            TypeAnnotation::Tuple(elements) => Type::Tuple(elements.iter().map(Type::from).collect()),
            TypeAnnotation::Named(name) => Type::Struct(name.clone(), vec![]),
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "Int"),
            Type::Float => write!(f, "Float"),
            Type::Bool => write!(f, "Bool"),
            Type::String => write!(f, "String"),
            Type::Void => write!(f, "Void"),
            Type::Array(element) => write!(f, "[{}]", element),
            Type::Tuple(elements) => {
                let elements: Vec<String> = elements.iter().map(|ty| ty.to_string()).collect();
                write!(f, "({})", elements.join(", "))
            }
            Type::Struct(name, _) => write!(f, "struct {}", name),
            Type::Function(parameters, return_type) => {
                let parameters: Vec<String> = parameters.iter().map(|ty| ty.to_string()).collect();
                write!(f, "fn({}) -> {}", parameters.join(", "), return_type)
            }
            Type::Unknown => write!(f, "<unknown>"),
        }
    }
}
