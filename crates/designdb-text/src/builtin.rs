//! Collections bundled into the binary so the foundation works without any
//! data directory.
use designdb_core::traits::DocumentSource;
use designdb_core::types::Document;

const BUILTIN: &[(&str, &str)] = &[
    ("charts", include_str!("../data/charts.json")),
    ("colors", include_str!("../data/colors.json")),
    ("guidelines", include_str!("../data/guidelines.json")),
    ("products", include_str!("../data/products.json")),
    ("stacks/react", include_str!("../data/stacks/react.json")),
    ("stacks/react-native", include_str!("../data/stacks/react-native.json")),
    ("stacks/tailwind", include_str!("../data/stacks/tailwind.json")),
    ("styles", include_str!("../data/styles.json")),
    ("typography", include_str!("../data/typography.json")),
];

pub struct BuiltinSource;

impl DocumentSource for BuiltinSource {
    fn load(&self) -> anyhow::Result<Vec<(String, Vec<Document>)>> {
        BUILTIN
            .iter()
            .map(|(name, raw)| {
                let docs: Vec<Document> = serde_json::from_str(raw).map_err(|e| anyhow::anyhow!("builtin collection {name}: {e}"))?;
                Ok((name.to_string(), docs))
            })
            .collect()
    }
}
