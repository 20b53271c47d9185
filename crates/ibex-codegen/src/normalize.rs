//! Final formatting pass over the generated module.

use crate::CodegenError;

/// Banner prepended to the normalized artifact.
pub(crate) const BANNER: &str = "// Code generated by ibex-gen. DO NOT EDIT.\n\
    //\n\
    // Edit the catalogue in ibex-codegen and re-run ibex-gen to refresh\n\
    // this file.\n\n";

/// Parse the generated text as a Rust source file and re-render it with a
/// canonical layout, banner first.
///
/// A parse failure here means the emitters produced malformed code; it
/// aborts the run before anything is written.
pub(crate) fn normalize(source: &str) -> Result<String, CodegenError> {
    let file = syn::parse_file(source).map_err(|e| CodegenError::Normalize {
        message: e.to_string(),
    })?;
    Ok(format!("{BANNER}{}", prettyplease::unparse(&file)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_renders_valid_source_with_banner() {
        let out = normalize("pub fn answer() -> u32 { 42 }").unwrap();
        assert!(out.starts_with("// Code generated by ibex-gen. DO NOT EDIT."));
        assert!(out.contains("pub fn answer() -> u32 {"));
    }

    #[test]
    fn normalize_rejects_malformed_source() {
        let err = normalize("pub fn {").unwrap_err();
        assert!(matches!(err, CodegenError::Normalize { .. }));
    }

    #[test]
    fn normalize_is_deterministic() {
        let src = "pub static T: &[(&str, u8)] = &[(\"x\", 1)];";
        assert_eq!(normalize(src).unwrap(), normalize(src).unwrap());
    }
}
