// Parser tests: comment stripping, nesting, error reporting

use proptest::prelude::*;
use tapestep::parser::ast::Program;
use tapestep::parser::Parser;
use tapestep::{parse, Command, SourceLocation};

#[test]
fn test_comment_characters_are_stripped() {
    assert_eq!(parse("a+b-c").unwrap(), parse("+-").unwrap());
    assert_eq!(parse("hello+world").unwrap(), parse("+").unwrap());
    assert_eq!(parse("no commands here!").unwrap(), vec![]);
}

#[test]
fn test_loop_structure() {
    assert_eq!(
        parse("[+]").unwrap(),
        vec![Command::Loop(vec![Command::Increment])]
    );
    assert_eq!(
        parse("[[]]").unwrap(),
        vec![Command::Loop(vec![Command::Loop(vec![])])]
    );
    assert_eq!(
        parse("+[>[-]<.]").unwrap(),
        vec![
            Command::Increment,
            Command::Loop(vec![
                Command::MoveRight,
                Command::Loop(vec![Command::Decrement]),
                Command::MoveLeft,
                Command::WriteOutput,
            ]),
        ]
    );
}

#[test]
fn test_unterminated_loop_is_an_error() {
    let errors = parse("[+").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors.to_string().contains("unterminated loop"));

    // Nested unclosed loops are each reported
    let errors = parse("+\n[[").unwrap_err();
    let locations: Vec<SourceLocation> = errors.iter().map(|e| e.location).collect();
    assert_eq!(
        locations,
        vec![SourceLocation::new(2, 1), SourceLocation::new(2, 2)]
    );
}

#[test]
fn test_multiple_independent_errors() {
    let errors = parse("]+]\n[").unwrap_err();

    assert_eq!(errors.len(), 3);
    assert!(errors.errors[0].message.contains("unmatched"));
    assert!(errors.errors[1].message.contains("unmatched"));
    assert!(errors.errors[2].message.contains("unterminated"));
    assert_eq!(errors.to_string().lines().count(), 3);
}

#[test]
fn test_deep_nesting_parses() {
    let depth = 100_000;
    let source = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
    let commands = parse(&source).expect("Parsing failed");
    let program = Program {
        commands,
        source_map: Default::default(),
    };

    assert_eq!(program.max_depth(), depth);
    assert_eq!(program.command_count(), depth);
}

#[test]
fn test_source_map_follows_nesting() {
    let program = Parser::new("[
  [.]
]")
        .parse_program()
        .expect("Parsing failed");
    let map = &program.source_map;

    assert_eq!(map.command(&[0]), Some(SourceLocation::new(1, 1)));
    assert_eq!(map.command(&[0, 0]), Some(SourceLocation::new(2, 3)));
    assert_eq!(map.command(&[0, 0, 0]), Some(SourceLocation::new(2, 4)));
    assert_eq!(map.loop_end(&[0, 0]), Some(SourceLocation::new(2, 5)));
    assert_eq!(map.loop_end(&[0]), Some(SourceLocation::new(3, 1)));
}

#[test]
fn test_deep_unterminated_nesting_fails() {
    let depth = 100_000;
    let source = format!("{}{}", "[".repeat(depth), "]".repeat(depth - 1));
    let errors = parse(&source).unwrap_err();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors.errors[0].location, SourceLocation::new(1, 1));
}

proptest! {
    #[test]
    fn parse_is_total(source in ".{0,200}") {
        match parse(&source) {
            Ok(_) => {}
            Err(errors) => prop_assert!(!errors.is_empty()),
        }
    }

    #[test]
    fn comments_do_not_change_the_tree(source in "[<>+\\-.,\\[\\]a-z ]{0,100}") {
        let stripped: String = source.chars().filter(|c| "<>+-.,[]".contains(*c)).collect();
        match (parse(&source), parse(&stripped)) {
            (Ok(with_comments), Ok(without)) => prop_assert_eq!(with_comments, without),
            (Err(with_comments), Err(without)) => prop_assert_eq!(with_comments.len(), without.len()),
            _ => prop_assert!(false, "comments changed whether the source parses"),
        }
    }
}
