use meridian_core::identifier::Id;
use meridian_core::sequence::{EntityKind, MessageStyle};
use meridian_parser::parse;

#[test]
fn test_simple_sequence() {
    let source = r#"
        actor user;
        component server;

        -> server : "start";
    "#;

    let sequence = parse(source).expect("Failed to parse");

    assert_eq!(sequence.entity_count(), 2);

    let user = sequence.entity(Id::new("user")).expect("user declared");
    assert_eq!(user.kind(), EntityKind::Actor);
    let server = sequence.entity(Id::new("server")).expect("server declared");
    assert_eq!(server.kind(), EntityKind::Component);

    assert_eq!(sequence.activations().len(), 1);
    let start = sequence.activations()[0].message();
    assert_eq!(start.style(), MessageStyle::Call);
    assert_eq!(start.from(), None);
    assert_eq!(start.to(), Some(Id::new("server")));
    assert_eq!(start.label(), "start");
}

#[test]
fn test_full_interaction() {
    let source = r#"
        // A login round-trip with an audit trail.
        actor user "The User";
        component gateway;
        component auth "Auth Service";

        -> gateway : "login" {
            -> auth : "check credentials" {
                -> * : "audit";
                return "token";
            };
            ~> user : "welcome email";
            return "session";
        };
    "#;

    let sequence = parse(source).expect("Failed to parse");

    assert_eq!(sequence.entity_count(), 3);
    let ids: Vec<_> = sequence.entity_ids().collect();
    assert_eq!(ids, [Id::new("user"), Id::new("gateway"), Id::new("auth")]);

    // Root: call from outside into the gateway
    let login = &sequence.activations()[0];
    assert_eq!(login.message().style(), MessageStyle::Call);
    assert_eq!(login.message().from(), None);
    assert!(login.has_body());

    let body = login.nested_activations();
    assert_eq!(body.len(), 3);

    // gateway -> auth, with its own body
    let check = &body[0];
    assert_eq!(check.message().from(), Some(Id::new("gateway")));
    assert_eq!(check.message().to(), Some(Id::new("auth")));
    let check_body = check.nested_activations();
    assert_eq!(check_body.len(), 2);
    assert_eq!(check_body[0].message().style(), MessageStyle::Lost);
    assert_eq!(check_body[1].message().style(), MessageStyle::Return);
    assert_eq!(check_body[1].message().label(), "token");

    // async notification, then the reply to the outside caller
    assert_eq!(body[1].message().style(), MessageStyle::AsyncCall);
    assert_eq!(body[2].message().style(), MessageStyle::Return);
    assert_eq!(body[2].message().to(), None);
}

#[test]
fn test_lexer_errors_surface_with_spans() {
    let source = "component a;\n-> a : \"unterminated;";

    let err = parse(source).expect_err("lexing should fail");
    let diagnostics = err.diagnostics();
    assert!(!diagnostics.is_empty());
    assert!(!diagnostics[0].labels().is_empty(), "diagnostic has a span");
}

#[test]
fn test_species_diagnostic_cites_evidence_token() {
    let source = "component a;\n~> a : \"fire and forget\" { };";

    let err = parse(source).expect_err("async call with body should fail");
    let diagnostic = &err.diagnostics()[0];
    let span = diagnostic.labels()[0].span();

    // The label points at the opening brace of the forbidden block
    assert_eq!(&source[span.start()..span.end()], "{");
}
