// Query module - operators, backend-neutral conditions, and translators

pub mod condition;
pub mod operators;
pub mod translators;

pub use condition::{
    Condition, Predicate, PredicateValue, TranslatedCondition, TreeError, translate_tree,
    validate_tree,
};
pub use operators::{Lookup, Operator};
pub use translators::{
    DefaultTranslator, TranslateContext, TranslateError, Translator, TranslatorRegistry,
};
