use pretty_assertions::assert_eq;
use sparqlburger::prelude::*;

fn person_pattern(patterns: &mut PatternArena) -> PatternId {
    let id = patterns.add(GraphPattern::new());
    patterns[id].add_triples([
        Triple::new("?person", "rdf:type", "ex:Person"),
        Triple::new("?person", "ex:hasName", "?name"),
    ]);
    id
}

#[test]
fn test_two_triple_pattern() {
    let mut patterns = PatternArena::new();
    let id = person_pattern(&mut patterns);

    assert_eq!(
        patterns.render(id, 0),
        "{\n   ?person rdf:type ex:Person . \n   ?person ex:hasName ?name . \n}\n"
    );
}

#[test]
fn test_optional_block_after_triples() {
    let mut patterns = PatternArena::new();
    let id = person_pattern(&mut patterns);
    let optional = patterns.add(GraphPattern::optional());
    patterns[optional].add_triple(Triple::new("?person", "ex:hasAge", "?age"));
    patterns.nest(id, optional).unwrap();

    assert_eq!(
        patterns.render(id, 0),
        "{\n   ?person rdf:type ex:Person . \n   ?person ex:hasName ?name . \n   OPTIONAL {\n      ?person ex:hasAge ?age . \n   }\n}\n"
    );
}

#[test]
fn test_select_query_sections_in_order() {
    let mut patterns = PatternArena::new();
    let where_pattern = patterns.add(GraphPattern::new());
    patterns[where_pattern].add_triples([
        Triple::new("?person", "rdf:type", "ex:Person"),
        Triple::new("?person", "ex:hasAge", "?age"),
        Triple::new("?person", "ex:address", "?address"),
    ]);

    let mut query = SelectQuery::new().with_distinct(true).with_limit(100);
    query
        .add_prefix(Prefix::new("ex", "http://www.example.com#"))
        .add_variables(["?person", "?age"])
        .set_where_pattern(where_pattern)
        .add_group_by(GroupBy::new(["?age"]));

    assert_eq!(
        query.render(&patterns),
        "PREFIX ex: <http://www.example.com#>\n\
         \n\
         SELECT DISTINCT ?person ?age\n\
         WHERE {\n   ?person rdf:type ex:Person . \n   ?person ex:hasAge ?age . \n   ?person ex:address ?address . \n}\n\
         GROUP BY ?age\n\
         LIMIT 100"
    );
}

#[test]
fn test_select_query_with_offset() {
    let mut patterns = PatternArena::new();
    let where_pattern = person_pattern(&mut patterns);

    let mut query = SelectQuery::new().with_limit(100).with_offset(100);
    query.set_where_pattern(where_pattern);

    let text = query.render(&patterns);
    assert!(text.starts_with("SELECT *\nWHERE {\n"));
    assert!(text.ends_with("}\nLIMIT 100\nOFFSET 100"));
}

#[test]
fn test_update_query_sections_in_order() {
    let mut patterns = PatternArena::new();

    let delete = patterns.add(GraphPattern::new());
    patterns[delete].add_triple(Triple::new("?person", "ex:hasAge", "?age"));

    let insert = patterns.add(GraphPattern::new());
    patterns[insert].add_triple(Triple::new("?person", "ex:hasAge", "32"));

    let where_pattern = patterns.add(GraphPattern::new());
    patterns[where_pattern].add_triples([
        Triple::new("?person", "rdf:type", "ex:Person"),
        Triple::new("?person", "ex:hasAge", "?age"),
    ]);

    let mut query = UpdateQuery::new();
    query
        .add_prefix(Prefix::new("ex", "http://www.example.com#"))
        .set_where_pattern(where_pattern)
        .set_insert_pattern(insert)
        .set_delete_pattern(delete);

    assert_eq!(
        query.render(&patterns),
        "PREFIX ex: <http://www.example.com#>\n\
         \n\
         DELETE {\n   ?person ex:hasAge ?age . \n}\n\
         INSERT {\n   ?person ex:hasAge 32 . \n}\n\
         WHERE {\n   ?person rdf:type ex:Person . \n   ?person ex:hasAge ?age . \n}"
    );
}

#[test]
fn test_empty_update_query() {
    let patterns = PatternArena::new();
    assert_eq!(UpdateQuery::new().render(&patterns), "");
}

#[test]
fn test_union_adjacency() {
    let mut patterns = PatternArena::new();
    let parent = patterns.add(GraphPattern::new());
    let a = patterns.add(GraphPattern::new());
    patterns[a].add_triple(Triple::new("?x", "a", "ex:Cat"));
    let b = patterns.add(GraphPattern::union());
    patterns[b].add_triple(Triple::new("?x", "a", "ex:Dog"));
    patterns.nest(parent, a).unwrap();
    patterns.nest(parent, b).unwrap();

    assert_eq!(
        patterns.render(parent, 0),
        "{\n   {\n      ?x a ex:Cat . \n   }\n   UNION\n   {\n      ?x a ex:Dog . \n   }\n}\n"
    );
}

#[test]
fn test_body_indentation_matches_depth() {
    let mut patterns = PatternArena::new();
    let mut ids = Vec::new();
    for depth in 0..6 {
        let id = patterns.add(GraphPattern::new());
        patterns[id]
            .add_triple(Triple::new("?s", "ex:depth", depth.to_string()))
            .add_filter(Filter::new(format!("?s != ex:n{}", depth)));
        if let Some(&parent) = ids.last() {
            patterns.nest(parent, id).unwrap();
        }
        ids.push(id);
    }

    let text = patterns.render(ids[0], 0);
    for line in text.lines() {
        let trimmed = line.trim_start();
        let width = line.len() - trimmed.len();
        if let Some(depth) = trimmed.strip_prefix("?s ex:depth ") {
            let depth: usize = depth.trim_end_matches(" . ").parse().unwrap();
            assert_eq!(width, 3 * (depth + 1), "line: {:?}", line);
        }
    }
    assert!(text.ends_with("   }\n}\n"));
}

#[test]
fn test_cycles_rejected_and_tree_unchanged() {
    let mut patterns = PatternArena::new();
    let root = person_pattern(&mut patterns);
    let child = patterns.add(GraphPattern::optional());
    let grandchild = patterns.add(GraphPattern::new());
    patterns.nest(root, child).unwrap();
    patterns.nest(child, grandchild).unwrap();

    let before = patterns.render(root, 0);

    assert!(matches!(
        patterns.nest(root, root),
        Err(BuilderError::CyclicNesting { .. })
    ));
    assert!(matches!(
        patterns.nest(grandchild, root),
        Err(BuilderError::CyclicNesting { .. })
    ));

    assert_eq!(patterns.render(root, 0), before);
    assert!(patterns[grandchild].nested().is_empty());
}

#[test]
fn test_recipe_matches_builder_output() {
    let recipe = Recipe::from_toml_str(
        r#"
        distinct = true
        limit = 100
        variables = ["?person", "?age"]
        group_by = [["?age"]]

        [[prefix]]
        name = "ex"
        namespace = "http://www.example.com#"

        [where]
        triples = [
            "?person rdf:type ex:Person .",
            "?person ex:hasAge ?age .",
            "?person ex:address ?address .",
        ]
        "#,
    )
    .unwrap();

    let mut patterns = PatternArena::new();
    let where_pattern = patterns.add(GraphPattern::new());
    patterns[where_pattern].add_triples([
        Triple::new("?person", "rdf:type", "ex:Person"),
        Triple::new("?person", "ex:hasAge", "?age"),
        Triple::new("?person", "ex:address", "?address"),
    ]);
    let mut query = SelectQuery::new().with_distinct(true).with_limit(100);
    query
        .add_prefix(Prefix::new("ex", "http://www.example.com#"))
        .add_variables(["?person", "?age"])
        .set_where_pattern(where_pattern)
        .add_group_by(GroupBy::new(["?age"]));

    assert_eq!(recipe.build().unwrap().render(), query.render(&patterns));
}
