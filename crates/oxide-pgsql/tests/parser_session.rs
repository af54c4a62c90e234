//! Tests for SET, RESET, SHOW and transaction control.

mod common;
use common::*;

use oxide_pgsql::ast::{
    IsolationLevel, OptionValue, SetScope, SetTarget, SetValue, Statement, TransactionKind,
    TransactionMode, VariableTarget,
};

#[test]
fn set_variable() {
    let Statement::SetVariable(set) = parse("SET search_path TO app, public") else {
        panic!("expected SET");
    };
    assert_eq!(set.scope, None);
    assert!(matches!(&set.target, SetTarget::Variable(name) if name.to_string() == "search_path"));
    assert_eq!(
        set.value,
        SetValue::Values(vec![
            OptionValue::Word("app".into()),
            OptionValue::Word("public".into()),
        ])
    );
    round_trip("SET search_path TO app, public");
}

#[test]
fn set_scoped_and_default() {
    let Statement::SetVariable(set) = parse("SET SESSION statement_timeout = DEFAULT") else {
        panic!("expected SET");
    };
    assert_eq!(set.scope, Some(SetScope::Session));
    assert_eq!(set.value, SetValue::Default);
    for sql in [
        "SET LOCAL work_mem = '64MB'",
        "SET TIME ZONE 'UTC'",
        "SET TIME ZONE DEFAULT",
        "SET SCHEMA 'app'",
        "SET ROLE admin",
        "SET SESSION AUTHORIZATION DEFAULT",
        "SET my.custom_setting TO on",
        "SET extra_float_digits = -1",
    ] {
        round_trip(sql);
    }
}

#[test]
fn set_transaction_modes() {
    let Statement::SetTransaction(set) =
        parse("SET TRANSACTION ISOLATION LEVEL READ COMMITTED READ WRITE")
    else {
        panic!("expected SET TRANSACTION");
    };
    assert_eq!(
        set.modes,
        vec![
            TransactionMode::IsolationLevel(IsolationLevel::ReadCommitted),
            TransactionMode::ReadWrite,
        ]
    );
    round_trip("SET SESSION CHARACTERISTICS AS TRANSACTION ISOLATION LEVEL SERIALIZABLE, DEFERRABLE");
    round_trip("SET LOCAL TRANSACTION READ ONLY");
}

#[test]
fn conflicting_transaction_modes() {
    let e = parse_semantic_err("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE, ISOLATION LEVEL READ COMMITTED");
    assert_eq!(e.message, "conflicting or redundant options");
    let _ = parse_semantic_err("START TRANSACTION DEFERRABLE, NOT DEFERRABLE");
}

#[test]
fn reset_and_show() {
    for (sql, target) in [
        ("RESET ALL", VariableTarget::All),
        ("RESET TIME ZONE", VariableTarget::TimeZone),
        ("SHOW SESSION AUTHORIZATION", VariableTarget::SessionAuthorization),
        ("SHOW TRANSACTION ISOLATION LEVEL", VariableTarget::TransactionIsolation),
    ] {
        let target_of = match parse(sql) {
            Statement::ResetVariable(reset) => reset.target,
            Statement::ShowVariable(show) => show.target,
            other => panic!("unexpected statement {other:?}"),
        };
        assert_eq!(target_of, target, "{sql}");
        prints_as_written(sql);
    }
    round_trip("SHOW search_path");
    round_trip("RESET my.setting");
}

#[test]
fn transaction_statements() {
    let cases = [
        ("BEGIN", TransactionKind::Begin(Vec::new())),
        (
            "BEGIN WORK ISOLATION LEVEL READ UNCOMMITTED",
            TransactionKind::Begin(vec![TransactionMode::IsolationLevel(
                IsolationLevel::ReadUncommitted,
            )]),
        ),
        (
            "START TRANSACTION READ ONLY, DEFERRABLE",
            TransactionKind::Start(vec![TransactionMode::ReadOnly, TransactionMode::Deferrable]),
        ),
        ("COMMIT", TransactionKind::Commit { chain: false }),
        ("END TRANSACTION", TransactionKind::Commit { chain: false }),
        ("COMMIT AND CHAIN", TransactionKind::Commit { chain: true }),
        ("ROLLBACK", TransactionKind::Rollback { chain: false }),
        ("ABORT WORK", TransactionKind::Rollback { chain: false }),
    ];
    for (sql, expected) in cases {
        let Statement::Transaction(t) = parse(sql) else {
            panic!("expected transaction statement for {sql}");
        };
        assert_eq!(t.kind, expected, "{sql}");
        round_trip(sql);
    }
}

#[test]
fn savepoints() {
    for sql in [
        "SAVEPOINT before_update",
        "RELEASE SAVEPOINT before_update",
        "RELEASE before_update",
        "ROLLBACK TO SAVEPOINT before_update",
        "ROLLBACK WORK TO before_update",
    ] {
        let Statement::Transaction(t) = parse(sql) else {
            panic!("expected transaction statement for {sql}");
        };
        let name = match &t.kind {
            TransactionKind::Savepoint(name)
            | TransactionKind::Release(name)
            | TransactionKind::RollbackTo(name) => name,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(name.value, "before_update");
        round_trip(sql);
    }
}

#[test]
fn transaction_script() {
    let statements = oxide_pgsql::parse_sql(
        "BEGIN;\nSET LOCAL lock_timeout = '1s';\nUPDATE t SET a = 1;\nCOMMIT;",
    )
    .unwrap();
    let kinds: Vec<_> = statements.iter().map(Statement::kind_name).collect();
    assert_eq!(kinds, ["transaction", "set", "update", "transaction"]);
}
