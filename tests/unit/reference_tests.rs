//! Reference metadata tests
//!
//! Each variant's Items list and required SQLCMD variables, matched against
//! the original tool's behavior, including the opaque `server,port` form.

use dir2dac::config::{Configuration, Reference, SystemDatabase};
use dir2dac::Dir2DacError;

fn items_contain(reference: &Reference, name: &str, value: &str) -> bool {
    reference
        .data()
        .items
        .iter()
        .any(|(n, v)| n == name && v == value)
}

#[test]
fn test_parse_this_reference() {
    let config =
        Configuration::from_args([r"/r=this=c:\path\to\dacpac.dacpac=dacpacName"]).unwrap();

    assert_eq!(config.references.len(), 1);
    let reference = &config.references[0];
    assert!(matches!(reference, Reference::This { .. }));
    assert!(items_contain(reference, "FileName", r"c:\path\to\dacpac.dacpac"));
    assert!(items_contain(reference, "LogicalName", "dacpacName"));
    assert!(reference.data().required_sqlcmd_vars.is_empty());
}

#[test]
fn test_parse_other_reference() {
    let config =
        Configuration::from_args([r"/r=other=c:\path\to\dacpac.dacpac=dacpacName=dbName"]).unwrap();

    assert_eq!(config.references.len(), 1);
    let reference = &config.references[0];
    assert!(matches!(reference, Reference::Other { .. }));
    assert!(items_contain(reference, "FileName", r"c:\path\to\dacpac.dacpac"));
    assert!(items_contain(reference, "LogicalName", "dacpacName"));
    assert!(items_contain(reference, "ExternalParts", "[$(dbName)]"));
    assert_eq!(reference.data().required_sqlcmd_vars, vec!["dbName"]);
}

#[test]
fn test_parse_other_server_reference() {
    let config = Configuration::from_args([
        r"/r=otherserver=c:\path\to\dacpac.dacpac=dacpacName=dbName=serverName,123",
    ])
    .unwrap();

    assert_eq!(config.references.len(), 1);
    let reference = &config.references[0];
    assert!(matches!(reference, Reference::OtherServer { .. }));
    assert!(items_contain(reference, "FileName", r"c:\path\to\dacpac.dacpac"));
    assert!(items_contain(reference, "LogicalName", "dacpacName"));
    // The server identifier is opaque: the comma is part of the name
    assert!(items_contain(
        reference,
        "ExternalParts",
        "[$(serverName,123)].[$(dbName)]"
    ));

    let vars = reference.data().required_sqlcmd_vars;
    assert!(vars.contains(&"dbName".to_string()));
    assert!(vars.contains(&"serverName,123".to_string()));
}

#[test]
fn test_parse_master_reference() {
    let config = Configuration::from_args([r"/r=MASTER=c:\path\to\dacpac.dacpac"]).unwrap();

    assert_eq!(config.references.len(), 1);
    let reference = &config.references[0];
    assert!(matches!(
        reference,
        Reference::System {
            database: SystemDatabase::Master,
            ..
        }
    ));
    assert!(items_contain(reference, "FileName", r"c:\path\to\dacpac.dacpac"));
    assert!(items_contain(reference, "LogicalName", "master.dacpac"));
    assert!(items_contain(reference, "ExternalParts", "[master]"));
    // System database names are never SQLCMD variables
    assert!(reference.data().required_sqlcmd_vars.is_empty());
}

#[test]
fn test_parse_msdb_reference() {
    let config = Configuration::from_args([r"/r=msDB=c:\path\to\dacpac.dacpac"]).unwrap();

    assert_eq!(config.references.len(), 1);
    let reference = &config.references[0];
    assert!(matches!(
        reference,
        Reference::System {
            database: SystemDatabase::Msdb,
            ..
        }
    ));
    assert!(items_contain(reference, "LogicalName", "msdb.dacpac"));
    assert!(items_contain(reference, "ExternalParts", "[msdb]"));
    assert!(reference.data().required_sqlcmd_vars.is_empty());
}

#[test]
fn test_items_are_ordered() {
    let reference = Reference::from_segments(
        "otherserver",
        &[
            "f.dacpac".to_string(),
            "logical".to_string(),
            "db".to_string(),
            "srv".to_string(),
        ],
    )
    .unwrap();

    let data = reference.data();
    let names: Vec<&str> = data.items.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["FileName", "LogicalName", "ExternalParts"]);
}

#[test]
fn test_reference_arity_errors() {
    let err = Configuration::from_args([r"/r=this=c:\only\file.dacpac"]).unwrap_err();
    assert!(matches!(
        err,
        Dir2DacError::ReferenceArityError {
            expected: 2,
            actual: 1,
            ..
        }
    ));

    let err = Configuration::from_args([r"/r=other=f=l"]).unwrap_err();
    assert!(matches!(
        err,
        Dir2DacError::ReferenceArityError {
            expected: 3,
            actual: 2,
            ..
        }
    ));

    let err = Configuration::from_args([r"/r=otherserver=f=l=db=srv=extra"]).unwrap_err();
    assert!(matches!(
        err,
        Dir2DacError::ReferenceArityError {
            expected: 4,
            actual: 5,
            ..
        }
    ));

    let err = Configuration::from_args([r"/r=master=f=extra"]).unwrap_err();
    assert!(matches!(
        err,
        Dir2DacError::ReferenceArityError {
            expected: 1,
            actual: 2,
            ..
        }
    ));
}

#[test]
fn test_unknown_reference_kind() {
    let err = Configuration::from_args([r"/r=sibling=f=l"]).unwrap_err();
    assert!(matches!(
        err,
        Dir2DacError::UnknownReferenceKindError { kind } if kind == "sibling"
    ));
}

#[test]
fn test_multiple_references_keep_order() {
    let config = Configuration::from_args([
        r"/r=master=m.dacpac",
        r"/r=this=t.dacpac=self",
        r"/r=other=o.dacpac=ext=extDb",
    ])
    .unwrap();

    assert_eq!(config.references.len(), 3);
    assert_eq!(config.references[0].file_name(), "m.dacpac");
    assert_eq!(config.references[1].file_name(), "t.dacpac");
    assert_eq!(config.references[2].file_name(), "o.dacpac");
    assert_eq!(config.required_sqlcmd_vars(), vec!["extDb"]);
}
