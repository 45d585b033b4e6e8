//! Search command handler

use anyhow::Result;

use stockroom_core::{Category, FilterField, QuerySpec, SortKey, Workspace};

use crate::output::Output;

/// Build the query from command-line arguments
pub fn build_spec(
    query: Option<String>,
    field: FilterField,
    sort: SortKey,
    types: &[Category],
) -> QuerySpec {
    let mut spec = QuerySpec::new().with_sort(sort);
    if let Some(query) = query {
        spec = spec.with_query(query, field);
    }
    for &category in types {
        spec.include_category(category);
    }
    spec
}

/// Filter and sort records
pub fn run(workspace: &Workspace, spec: &QuerySpec, output: &Output) -> Result<()> {
    let result = workspace.inventory().search(spec);
    output.print_records(result.records())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_spec() {
        let spec = build_spec(
            Some("juice".to_string()),
            FilterField::Description,
            SortKey::PriceDesc,
            &[Category::SoftDrink, Category::Fruit, Category::SoftDrink],
        );

        assert_eq!(spec.text_query, "juice");
        assert_eq!(spec.filter_field, FilterField::Description);
        assert_eq!(spec.sort_key, SortKey::PriceDesc);
        assert_eq!(spec.type_filter.len(), 2);
    }

    #[test]
    fn test_build_spec_defaults_match_everything() {
        let spec = build_spec(None, FilterField::Name, SortKey::Id, &[]);
        assert_eq!(spec, QuerySpec::new());
    }
}
