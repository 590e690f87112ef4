use mtp_tl_dump::schema::{
    Category, Definition, ParameterType, ParseError, ParseErrorKind, parse_schema,
};

#[test]
fn parses_simple_type() {
    let src = "boolFalse#bc799737 = Bool;";
    let defs: Vec<_> = parse_schema(src).collect::<Result<_, _>>().unwrap();
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].name, "boolFalse");
    assert_eq!(defs[0].id, 0xbc799737);
    assert_eq!(defs[0].ty.name, "Bool");
    assert!(!defs[0].ty.bare);
}

#[test]
fn parses_function_category() {
    let src = "
---functions---
help.getConfig#c4f9186b = Config;
";
    let defs: Vec<_> = parse_schema(src).collect::<Result<_, _>>().unwrap();
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].category, Category::Functions);
    assert_eq!(defs[0].name, "getConfig");
    assert_eq!(defs[0].namespace, vec!["help"]);
    assert_eq!(defs[0].full_name(), "help.getConfig");
}

#[test]
fn parses_flagged_parameter() {
    let src = "user#3ff6ecb0 flags:# id:long username:flags.0?string = User;";
    let defs: Vec<_> = parse_schema(src).collect::<Result<_, _>>().unwrap();
    assert_eq!(defs[0].params.len(), 3);
    assert_eq!(defs[0].params[0].ty, ParameterType::Flags);
    match &defs[0].params[2].ty {
        ParameterType::Normal { ty, flag: Some(flag) } => {
            assert_eq!(ty.name, "string");
            assert_eq!(flag.name, "flags");
            assert_eq!(flag.index, 0);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(defs[0].flag_fields().collect::<Vec<_>>(), ["flags"]);
}

#[test]
fn skips_blank_lines_and_comments() {
    let src = "
// this is a comment
boolTrue#997275b5 = Bool; // trailing comment
// another comment

boolFalse#bc799737 = Bool;
";
    let defs: Vec<_> = parse_schema(src).collect::<Result<_, _>>().unwrap();
    assert_eq!(defs.len(), 2);
}

#[test]
fn crc32_derived_id() {
    let defs: Vec<_> = parse_schema("boolFalse = Bool;").collect::<Result<_, _>>().unwrap();
    assert_eq!(defs[0].id, 0xbc799737);
}

#[test]
fn parses_bare_percent_and_vectors() {
    let src = "msg_container#73f1f8dc messages:vector<%Message> = MessageContainer;";
    let defs: Vec<_> = parse_schema(src).collect::<Result<_, _>>().unwrap();
    let ParameterType::Normal { ty, .. } = &defs[0].params[0].ty else {
        panic!("expected a typed parameter");
    };
    assert!(ty.is_vector());
    assert!(ty.bare);
    let arg = ty.generic_arg.as_deref().unwrap();
    assert_eq!(arg.name, "Message");
    assert!(arg.bare);
    assert_eq!(ty.to_string(), "vector<%Message>");
}

#[test]
fn parses_generic_query() {
    let src = "---functions---\ninvokeWithLayer#da9b0d0d {X:Type} layer:int query:!X = X;";
    let defs: Vec<_> = parse_schema(src).collect::<Result<_, _>>().unwrap();
    let def = &defs[0];
    assert_eq!(def.params.len(), 2);
    assert!(def.ty.generic_ref);
    assert!(def.to_string().starts_with("invokeWithLayer#da9b0d0d {X:Type} layer:int query:!X = "));
}

#[test]
fn multi_line_definition() {
    let src = "pong#347773c5\n    msg_id:long\n    ping_id:long = Pong;";
    let defs: Vec<_> = parse_schema(src).collect::<Result<_, _>>().unwrap();
    assert_eq!(defs[0].params.len(), 2);
}

#[test]
fn undeclared_flag_field_is_rejected() {
    let err = parse_schema("a#1 x:flags.0?int = A;").next().unwrap().unwrap_err();
    assert_eq!(err, ParseError { line: 1, kind: ParseErrorKind::UnknownFlag("flags".into()) });
    assert_eq!(err.to_string(), "line 1: no `flags:#` field before its use");
}

#[test]
fn undeclared_generic_is_rejected() {
    let err = parse_schema("a#1 query:!X = X;").next().unwrap().unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnknownGeneric("X".into()));
}

#[test]
fn errors_report_line() {
    let src = "ok#1 = A;\n\nbad#zz = B;";
    let results: Vec<_> = parse_schema(src).collect();
    assert!(results[0].is_ok());
    match &results[1] {
        Err(ParseError { line, kind }) => {
            assert_eq!(*line, 3);
            assert!(matches!(kind, ParseErrorKind::BadId(_)));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn builtin_syntax_is_not_implemented() {
    let err = parse_schema("int ? = Int;").next().unwrap().unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::Untyped("?".into()));
    assert!(err.to_string().contains("unsupported"));
}

#[test]
fn malformed_tokens_name_the_token() {
    let kind = |src: &str| src.parse::<Definition>().unwrap_err();
    assert_eq!(kind("a#1 x:flags.x?int = A"), ParseErrorKind::BadFlag("flags.x?int".into()));
    assert_eq!(kind("a#1 {X} = A"), ParseErrorKind::BadTypeParam("{X}".into()));
    assert_eq!(kind("a#1 v:Vector<int = A"), ParseErrorKind::UnclosedGeneric);
    assert_eq!(kind("a#1 :int = A"), ParseErrorKind::BadName);
    assert_eq!(kind("a#1 x:int"), ParseErrorKind::MissingType);
    assert_eq!(kind(""), ParseErrorKind::MissingType);
}

#[test]
fn service_schema_parses_cleanly() {
    for result in parse_schema(mtp_tl_dump::registry::SERVICE_SCHEMA) {
        assert!(result.is_ok(), "{result:?}");
    }
}
