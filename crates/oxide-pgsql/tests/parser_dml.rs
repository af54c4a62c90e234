//! Tests for INSERT, UPDATE and DELETE.

mod common;
use common::*;

use oxide_pgsql::ast::{
    ConflictAction, ConflictTarget, ExprKind, Indirection, InsertSource, NullOrdering,
    OrderDirection, Overriding, Selection, SetExpr,
};

// ===================================================================
// INSERT
// ===================================================================

#[test]
fn insert_values() {
    let i = parse_insert("INSERT INTO users (id, name) VALUES (1, 'a'), (2, DEFAULT)");
    assert_eq!(i.table.to_string(), "users");
    assert_eq!(i.columns.len(), 2);
    let InsertSource::Query(query) = &i.source else {
        panic!("expected query source");
    };
    let SetExpr::Values(values) = &query.body else {
        panic!("expected VALUES");
    };
    assert_eq!(values.rows.len(), 2);
    assert_eq!(values.rows[1][1].kind, ExprKind::Default);
    prints_as_written("INSERT INTO users (id, name) VALUES (1, 'a'), (2, DEFAULT)");
}

#[test]
fn insert_select_and_default_values() {
    let i = parse_insert("INSERT INTO archive SELECT * FROM users WHERE deleted");
    let InsertSource::Query(query) = &i.source else {
        panic!("expected query source");
    };
    assert!(matches!(query.body, SetExpr::Select(_)));

    let i = parse_insert("INSERT INTO t DEFAULT VALUES RETURNING id");
    assert_eq!(i.source, InsertSource::DefaultValues);
    assert_eq!(i.returning.len(), 1);
    prints_as_written("INSERT INTO t DEFAULT VALUES RETURNING id");
}

#[test]
fn insert_overriding() {
    let i = parse_insert("INSERT INTO t (id) OVERRIDING SYSTEM VALUE VALUES (1)");
    assert_eq!(i.overriding, Some(Overriding::System));
    prints_as_written("INSERT INTO t (id) OVERRIDING SYSTEM VALUE VALUES (1)");
}

#[test]
fn insert_with_values_and_select_is_rejected() {
    let e = parse_semantic_err("INSERT INTO t VALUES (1) UNION ALL SELECT 2");
    assert_eq!(e.message, "INSERT has both a VALUES list and a sub-SELECT");
}

#[test]
fn insert_arity_is_checked() {
    let e = parse_semantic_err("INSERT INTO t (a) VALUES (1, 2)");
    assert_eq!(e.message, "INSERT has more expressions than target columns");
    let e = parse_semantic_err("INSERT INTO t VALUES (1, 2), (3)");
    assert_eq!(e.message, "VALUES lists must all be the same length");
}

#[test]
fn insert_on_conflict() {
    let i = parse_insert(
        "INSERT INTO t (id, n) VALUES (1, 2) ON CONFLICT (id) WHERE active \
         DO UPDATE SET n = excluded.n WHERE t.n < excluded.n",
    );
    let on_conflict = i.on_conflict.unwrap();
    assert!(matches!(
        on_conflict.target,
        Some(ConflictTarget::Columns {
            selection: Some(_),
            ..
        })
    ));
    assert!(matches!(
        on_conflict.action,
        ConflictAction::DoUpdate {
            selection: Some(_),
            ..
        }
    ));
    round_trip(
        "INSERT INTO t (id, n) VALUES (1, 2) ON CONFLICT (id) WHERE active \
         DO UPDATE SET n = excluded.n WHERE t.n < excluded.n",
    );
    round_trip("INSERT INTO t VALUES (1) ON CONFLICT DO NOTHING");
    round_trip("INSERT INTO t VALUES (1) ON CONFLICT ON CONSTRAINT t_pkey DO NOTHING");
}

#[test]
fn insert_target_columns_with_indirection() {
    let i = parse_insert("INSERT INTO t (a.b, c[1], d) VALUES (1, 2, 3)");
    assert_eq!(i.columns.len(), 3);
    assert!(matches!(&i.columns[0].indirection[..], [Indirection::Field(f)] if f.value == "b"));
    assert!(matches!(i.columns[1].indirection[..], [Indirection::Subscript(_)]));
    assert!(i.columns[2].indirection.is_empty());
    prints_as_written("INSERT INTO t (a.b, c[1], d) VALUES (1, 2, 3)");

    let e = parse_semantic_err("INSERT INTO t (a.*) VALUES (1)");
    assert_eq!(e.message, "row expansion via \"*\" is not supported here");
}

#[test]
fn insert_on_conflict_index_options() {
    let sql = "INSERT INTO t VALUES (1) ON CONFLICT \
               (a COLLATE \"C\" text_pattern_ops DESC NULLS LAST, (lower(b)) ASC) DO NOTHING";
    let i = parse_insert(sql);
    let Some(ConflictTarget::Columns { columns, .. }) = i.on_conflict.unwrap().target else {
        panic!("expected inference columns");
    };
    assert_eq!(columns[0].collation.as_ref().unwrap().to_string(), "\"C\"");
    assert_eq!(columns[0].opclass.as_ref().unwrap().to_string(), "text_pattern_ops");
    assert_eq!(columns[0].direction, Some(OrderDirection::Desc));
    assert_eq!(columns[0].nulls, Some(NullOrdering::Last));
    assert!(matches!(columns[1].expr.kind, ExprKind::Function(_)));
    assert!(columns[1].opclass.is_none());
    assert_eq!(columns[1].direction, Some(OrderDirection::Asc));
    round_trip(sql);

    let i = parse_insert("INSERT INTO t VALUES (1) ON CONFLICT (a NULLS FIRST) DO NOTHING");
    let Some(ConflictTarget::Columns { columns, .. }) = i.on_conflict.unwrap().target else {
        panic!("expected inference columns");
    };
    assert!(columns[0].opclass.is_none());
    assert_eq!(columns[0].nulls, Some(NullOrdering::First));
}

#[test]
fn insert_on_conflict_update_needs_target() {
    let _ = parse_semantic_err("INSERT INTO t VALUES (1) ON CONFLICT DO UPDATE SET a = 1");
}

// ===================================================================
// UPDATE
// ===================================================================

#[test]
fn update_basic() {
    let u = parse_update("UPDATE users SET name = 'x', age = age + 1 WHERE id = 1 RETURNING *");
    assert_eq!(u.table.name.to_string(), "users");
    assert_eq!(u.assignments.len(), 2);
    assert!(matches!(u.selection, Some(Selection::Condition(_))));
    assert_eq!(u.returning.len(), 1);
    prints_as_written("UPDATE users SET name = 'x', age = age + 1 WHERE id = 1 RETURNING *");
}

#[test]
fn update_alias_and_from() {
    let u = parse_update("UPDATE t AS x SET a = u.a FROM u WHERE x.id = u.id");
    assert_eq!(u.alias.unwrap().value, "x");
    assert_eq!(u.from.len(), 1);
    let u = parse_update("UPDATE t x SET a = 1");
    assert_eq!(u.alias.unwrap().value, "x");
}

#[test]
fn update_multi_column_assignment() {
    let u = parse_update("UPDATE t SET (a, b) = (1, 2), (c) = (SELECT 3)");
    assert!(u.assignments.iter().all(|a| a.multi));
    assert_eq!(u.assignments[0].columns.len(), 2);
    round_trip("UPDATE t SET (a, b) = (1, 2), (c) = (SELECT 3)");
    round_trip("UPDATE t SET (a, b) = ROW(1, 2)");

    let e = parse_semantic_err("UPDATE t SET (a, b, c) = (1, 2)");
    assert_eq!(e.message, "number of columns does not match number of values");
}

#[test]
fn update_target_indirection() {
    let u = parse_update("UPDATE t SET a.b = 2, c[1] = 3, d[1:2] = e, f[:3].g = 4");
    let paths: Vec<_> = u.assignments.iter().map(|a| &a.columns[0].indirection).collect();
    assert!(matches!(paths[0][..], [Indirection::Field(_)]));
    assert!(matches!(paths[1][..], [Indirection::Subscript(_)]));
    assert!(matches!(
        paths[2][..],
        [Indirection::Slice {
            lower: Some(_),
            upper: Some(_)
        }]
    ));
    assert!(matches!(
        paths[3][..],
        [Indirection::Slice { lower: None, .. }, Indirection::Field(_)]
    ));
    prints_as_written("UPDATE t SET a.b = 2, c[1] = 3, d[1:2] = e, f[:3].g = 4");
    prints_as_written("UPDATE t SET (a.x, b[2]) = (1, 2)");
}

#[test]
fn update_where_current_of() {
    let u = parse_update("UPDATE t SET a = 1 WHERE CURRENT OF cur");
    assert!(matches!(u.selection, Some(Selection::CurrentOf(_))));
    prints_as_written("UPDATE t SET a = 1 WHERE CURRENT OF cur");
}

// ===================================================================
// DELETE
// ===================================================================

#[test]
fn delete_basic() {
    let d = parse_delete("DELETE FROM users WHERE id = $1");
    assert_eq!(d.table.name.to_string(), "users");
    assert!(d.selection.is_some());
    prints_as_written("DELETE FROM users WHERE id = $1");
}

#[test]
fn delete_using_returning() {
    let d = parse_delete("DELETE FROM ONLY t AS d USING u, v WHERE d.id = u.id RETURNING d.*");
    assert!(d.table.only);
    assert_eq!(d.using.len(), 2);
    assert_eq!(d.returning.len(), 1);
    prints_as_written("DELETE FROM ONLY t AS d USING u, v WHERE d.id = u.id RETURNING d.*");
}

#[test]
fn dml_with_cte() {
    let d = parse_delete("WITH old AS (SELECT id FROM t WHERE stale) DELETE FROM t USING old WHERE t.id = old.id");
    assert_eq!(d.with.unwrap().ctes.len(), 1);
    round_trip("WITH n AS (SELECT 1 AS v) INSERT INTO t SELECT v FROM n");
    round_trip("WITH n AS (SELECT 1 AS v) UPDATE t SET a = n.v FROM n");
}
