//! Mapping emitter.
//!
//! Renders one `map[string]T` literal per classification with `minijinja`.
//! The emitter is pure templating: names and the type are inserted as-is.

use minijinja::{context, Environment};

use crate::classify::Classification;
use crate::error::GenerateError;

const MAPPING_TEMPLATE_NAME: &str = "mapping.go";

const MAPPING_TEMPLATE: &str = "
var {{ type_name }}NameToValue = map[string]{{ type_name }}{
{% for name in names %}\t\"{{ name }}\": {{ name }},
{% endfor %}}
";

/// Appends mapping literals to a Go source buffer.
///
/// # Examples
///
/// ```
/// use mc_codegen::{GenerationRequest, MappingEmitter};
/// use mc_core::{ConstSpec, DeclarationGroup, Package, SourceUnit, TypeExpr};
///
/// let group = DeclarationGroup::new(vec![
///     ConstSpec::new("Red").with_type(TypeExpr::named("Color")).with_value(),
/// ]);
/// let unit = SourceUnit::new("colors.go", "paint", vec![group]);
/// let package = Package::new(".", vec![unit]).expect("one unit");
/// let result = GenerationRequest::new(&package, "Color").classify();
///
/// let mut out = String::new();
/// MappingEmitter::new()?.emit(&mut out, &result)?;
/// assert!(out.contains("var ColorNameToValue = map[string]Color{"));
/// assert!(out.contains("\t\"Red\": Red,\n"));
/// # Ok::<(), mc_codegen::GenerateError>(())
/// ```
#[derive(Debug)]
pub struct MappingEmitter {
    env: Environment<'static>,
}

impl MappingEmitter {
    /// Creates an emitter with the mapping template loaded.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Template`] if the template fails to compile.
    pub fn new() -> Result<Self, GenerateError> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.add_template(MAPPING_TEMPLATE_NAME, MAPPING_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Appends the mapping for `classification` to `out`.
    ///
    /// Entries follow match order; duplicates are emitted as they are.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Template`] if rendering fails.
    pub fn emit(&self, out: &mut String, classification: &Classification) -> Result<(), GenerateError> {
        let template = self.env.get_template(MAPPING_TEMPLATE_NAME)?;
        let names: Vec<&str> = classification.names().collect();
        let rendered = template.render(context! {
            type_name => classification.type_name(),
            names => names,
        })?;
        out.push_str(&rendered);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::GenerationRequest;
    use mc_core::{ConstSpec, DeclarationGroup, Package, SourceUnit, TypeExpr};

    fn classification(type_name: &str, names: &[&str]) -> Classification {
        let specs = names
            .iter()
            .map(|n| ConstSpec::new(*n).with_type(TypeExpr::named(type_name)))
            .collect();
        let unit = SourceUnit::new("a.go", "p", vec![DeclarationGroup::new(specs)]);
        let package = Package::new(".", vec![unit]).expect("package");
        GenerationRequest::new(&package, type_name).classify()
    }

    #[test]
    fn test_emit_exact_text() {
        let mut out = String::new();
        MappingEmitter::new()
            .expect("emitter")
            .emit(&mut out, &classification("Color", &["Red", "Green"]))
            .expect("emit");
        assert_eq!(
            out,
            "\nvar ColorNameToValue = map[string]Color{\n\t\"Red\": Red,\n\t\"Green\": Green,\n}\n"
        );
    }

    #[test]
    fn test_emit_appends() {
        let emitter = MappingEmitter::new().expect("emitter");
        let mut out = String::from("package p\n");
        emitter
            .emit(&mut out, &classification("A", &["X"]))
            .expect("emit");
        emitter
            .emit(&mut out, &classification("B", &["Y"]))
            .expect("emit");

        let a = out.find("var ANameToValue").expect("first block");
        let b = out.find("var BNameToValue").expect("second block");
        assert!(out.starts_with("package p\n"));
        assert!(a < b);
    }

    #[test]
    fn test_emit_keeps_duplicates() {
        let mut out = String::new();
        MappingEmitter::new()
            .expect("emitter")
            .emit(&mut out, &classification("T", &["A", "A"]))
            .expect("emit");
        assert_eq!(out.matches("\t\"A\": A,\n").count(), 2);
    }

    #[test]
    fn test_emit_does_not_escape_names() {
        let mut out = String::new();
        MappingEmitter::new()
            .expect("emitter")
            .emit(&mut out, &classification("T", &["a<b"]))
            .expect("emit");
        assert!(out.contains("\"a<b\": a<b,"));
    }
}
