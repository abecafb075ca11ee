//! Property-based tests for identity, merge, attach and the codecs.
//!
//! Parser properties only assert no-panic; composition properties check the
//! structural guarantees every merge and attach result must keep.

use proptest::prelude::*;
use sbom_compose::{
    attach, merge, same_identity, AttachOptions, Component, Dependency, DependencyGraph, Document,
    MergeOptions,
};
use sbom_compose::parsers::{detect_format, parse_bom_str};

fn arb_component(prefix: &'static str) -> impl Strategy<Value = Component> {
    (
        0u32..1000,
        prop::option::of(0u8..8),
        prop::option::of(0u8..8),
    )
        .prop_map(move |(n, purl, cpe)| {
            let mut c = Component::new(format!("{prefix}-{n}"), format!("pkg{n}"));
            if let Some(p) = purl {
                c = c.with_purl(format!("pkg:npm/p{p}@1.0.0"));
            }
            if let Some(v) = cpe {
                c = c.with_cpe(format!("cpe:2.3:a:v:p{v}:1.0:*:*:*:*:*:*:*"));
            }
            c
        })
}

fn arb_document(prefix: &'static str) -> impl Strategy<Value = Document> {
    prop::collection::vec(arb_component(prefix), 0..12).prop_map(move |mut components| {
        // Refs are unique within a document
        for (i, c) in components.iter_mut().enumerate() {
            c.bom_ref = format!("{prefix}-{i}");
        }
        let root = format!("{prefix}-root");
        let edges = vec![Dependency::with_children(
            root.clone(),
            components.iter().map(|c| Dependency::new(c.bom_ref.clone())).collect(),
        )];
        Document {
            root_component: Some(Component::new(root.clone(), root)),
            components,
            dependencies: DependencyGraph::from_edges(edges),
            ..Document::default()
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn same_identity_is_symmetric(a in arb_component("a"), b in arb_component("b")) {
        prop_assert_eq!(same_identity(&a, &b), same_identity(&b, &a));
    }

    #[test]
    fn same_identity_ignores_name_and_version(a in arb_component("a")) {
        let mut renamed = a.clone();
        renamed.name = "something-else".to_string();
        renamed.version = Some("0.0.0".to_string());
        let has_id = a.purl().is_some() || a.cpe().is_some();
        prop_assert_eq!(same_identity(&a, &renamed), has_id);
    }

    #[test]
    fn merge_never_grows_and_keeps_no_duplicate_identity(
        docs in prop::collection::vec(arb_document("d"), 0..5)
    ) {
        let total: usize = docs.iter().map(|d| d.components.len()).sum();
        let merged = merge(docs, "combined", &MergeOptions::default());

        prop_assert!(merged.components.len() <= total);
        for (i, a) in merged.components.iter().enumerate() {
            for b in &merged.components[i + 1..] {
                prop_assert!(!same_identity(a, b));
            }
        }
        prop_assert!(merged.dependencies.is_empty());
    }

    #[test]
    fn merge_is_exact_iff_no_shared_identity(
        docs in prop::collection::vec(arb_document("d"), 0..5)
    ) {
        let offered: Vec<Component> = docs.iter().flat_map(|d| d.components.clone()).collect();
        let any_shared = offered
            .iter()
            .enumerate()
            .any(|(i, a)| offered[i + 1..].iter().any(|b| same_identity(a, b)));

        let merged = merge(docs, "combined", &MergeOptions::default());
        prop_assert_eq!(merged.components.len() == offered.len(), !any_shared);
    }

    #[test]
    fn merge_keeps_every_unidentified_component(docs in prop::collection::vec(arb_document("d"), 1..4)) {
        let unidentified = docs
            .iter()
            .flat_map(|d| &d.components)
            .filter(|c| c.purl().is_none() && c.cpe().is_none())
            .count();
        let merged = merge(docs, "combined", &MergeOptions::default());
        let kept = merged
            .components
            .iter()
            .filter(|c| c.purl().is_none() && c.cpe().is_none())
            .count();
        prop_assert_eq!(kept, unidentified);
    }

    #[test]
    fn union_merge_is_referentially_sound(docs in prop::collection::vec(arb_document("d"), 1..4)) {
        // Prefix each document so refs stay distinct across inputs
        let docs: Vec<Document> = docs
            .into_iter()
            .enumerate()
            .map(|(i, mut d)| {
                let mut aliases = std::collections::HashMap::new();
                for c in d.root_component.iter_mut().chain(d.components.iter_mut()) {
                    let renamed = format!("{i}/{}", c.bom_ref);
                    aliases.insert(c.bom_ref.clone(), renamed.clone());
                    c.bom_ref = renamed;
                }
                d.dependencies.rename_refs(&aliases);
                d
            })
            .collect();
        let options = MergeOptions { union_dependencies: true, ..MergeOptions::default() };
        let merged = merge(docs, "combined", &options);
        prop_assert!(merged.validate().is_empty(), "{:?}", merged.validate());
    }

    #[test]
    fn attach_preserves_counts_and_reachability(
        root in arb_document("r"),
        leaf in arb_document("l"),
    ) {
        let root_count = root.component_count();
        let leaf_count = leaf.component_count();
        let leaf_refs: Vec<String> = leaf.components.iter().map(|c| c.bom_ref.clone()).collect();

        let combined = attach(root, leaf, &AttachOptions::default()).unwrap();
        prop_assert_eq!(combined.components.len(), root_count + leaf_count + 1);

        let reachable = combined.dependencies.reachable_from("r-root");
        prop_assert!(reachable.contains(&"l-root".to_string()));
        for r in &leaf_refs {
            prop_assert!(reachable.contains(r));
        }
        prop_assert!(combined.validate().is_empty());
    }
}

proptest! {
    // Random input is expected to produce Err in almost all cases; only
    // absence of panics is asserted.
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn parse_bom_str_doesnt_panic(s in "\\PC{0,2000}") {
        let _ = parse_bom_str(&s, None);
    }

    #[test]
    fn detect_format_doesnt_panic(s in "\\PC{0,2000}") {
        let _ = detect_format(&s);
    }

    #[test]
    fn xml_like_input_doesnt_panic(
        s in prop::string::string_regex(r#"<[a-z]{1,20}>[^<]{0,200}</[a-z]{1,20}>"#).unwrap()
    ) {
        let _ = parse_bom_str(&s, None);
    }

    #[test]
    fn spdx_tag_value_like_doesnt_panic(
        key in "[A-Za-z]{1,20}",
        value in "\\PC{0,100}",
    ) {
        let input = format!("SPDXVersion: SPDX-2.2\n{key}: {value}\n");
        let _ = parse_bom_str(&input, None);
        let _ = detect_format(&input);
    }

    #[test]
    fn cyclonedx_partial_xml_doesnt_panic(
        version in "1\\.[0-9]",
        extra in "\\PC{0,200}",
    ) {
        let input = format!(
            r#"<bom xmlns="http://cyclonedx.org/schema/bom/{version}"><components>{extra}</components></bom>"#
        );
        let _ = parse_bom_str(&input, None);
    }

    #[test]
    fn empty_and_whitespace_doesnt_panic(s in "\\s{0,100}") {
        let _ = parse_bom_str(&s, None);
        let _ = detect_format(&s);
    }
}
