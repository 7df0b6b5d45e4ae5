#[cfg(test)]
mod parser_tests {
    use rox::ast_printer::AstPrinter;
    use rox::error::LoxError;
    use rox::parser::Parser;
    use rox::scanner::scan_tokens;
    use rox::stmt::Stmt;

    fn parse(source: &str) -> Result<Vec<Stmt>, Vec<LoxError>> {
        let (tokens, lex_errors) = scan_tokens(source);
        assert!(lex_errors.is_empty(), "unexpected lex errors: {:?}", lex_errors);

        Parser::new(tokens).parse()
    }

    fn printed(source: &str) -> Vec<String> {
        parse(source)
            .expect("source should parse")
            .iter()
            .map(AstPrinter::print_stmt)
            .collect()
    }

    fn error_strings(source: &str) -> Vec<String> {
        parse(source)
            .expect_err("source should not parse")
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn precedence_ladder() {
        assert_eq!(
            printed("print 1 + 2 * 3 - -4 / (5);"),
            vec!["(print (- (+ 1.0 (* 2.0 3.0)) (/ (- 4.0) (group 5.0))))"]
        );
        assert_eq!(
            printed("a or b and c == d < e;"),
            vec!["(; (or a (and b (== c (< d e)))))"]
        );
    }

    #[test]
    fn single_expression() {
        let (tokens, _) = scan_tokens("!(a >= -1) != nil");
        let expr = Parser::new(tokens).parse_expression().expect("expression");

        assert_eq!(
            AstPrinter::print(&expr),
            "(!= (! (group (>= a (- 1.0)))) nil)"
        );
    }

    #[test]
    fn assignment_is_right_associative() {
        assert_eq!(printed("a = b = 1;"), vec!["(; (= a (= b 1.0)))"]);
    }

    #[test]
    fn property_assignment_becomes_set() {
        assert_eq!(
            printed("obj.field.inner = f(1)(2);"),
            vec!["(; (= (. (. obj field) inner) (call (call f 1.0) 2.0)))"]
        );
    }

    #[test]
    fn for_loop_desugars_into_while_inside_block() {
        assert_eq!(
            printed("for (var i = 0; i < 3; i = i + 1) print i;"),
            vec!["(block (var i 0.0) (while (< i 3.0) (block (print i) (; (= i (+ i 1.0))))))"]
        );
    }

    #[test]
    fn for_loop_without_clauses_loops_on_true() {
        assert_eq!(printed("for (;;) print 1;"), vec!["(while true (print 1.0))"]);
    }

    #[test]
    fn class_with_superclass_and_methods() {
        assert_eq!(
            printed("class B < A { init(x) { this.x = x; } get() { return super.get(); } }"),
            vec![
                "(class B < A (method init(x) (; (= (. this x) x))) (method get() (return (call (super get)))))"
            ]
        );
    }

    #[test]
    fn invalid_assignment_target() {
        assert_eq!(
            error_strings("1 + 2 = 3;"),
            vec!["[line 1] Error at '=': Invalid assignment target."]
        );
    }

    #[test]
    fn recovers_and_reports_every_missing_semicolon() {
        let errors = error_strings("print 1\nvar a = 2;\nprint a\nprint 3;");

        assert_eq!(
            errors,
            vec![
                "[line 2] Error at 'var': Expect ';' after value.",
                "[line 4] Error at 'print': Expect ';' after value.",
            ]
        );
    }

    #[test]
    fn error_at_end_of_input() {
        assert_eq!(
            error_strings("{ print 1;"),
            vec!["[line 1] Error at end: Expect '}' after block."]
        );
    }

    #[test]
    fn too_many_parameters_is_reported_but_parsing_continues() {
        let params: Vec<String> = (0..256).map(|i| format!("p{}", i)).collect();
        let source = format!("fun f({}) {{}}\nprint 1 +;", params.join(", "));

        let errors = error_strings(&source);

        assert_eq!(errors.len(), 2);
        assert!(errors[0].ends_with("Can't have more than 255 parameters."));
        assert_eq!(errors[1], "[line 2] Error at ';': Expect expression.");
    }

    #[test]
    fn too_many_arguments_is_reported_but_parsing_continues() {
        let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
        let source = format!("f({});\nprint 1 +;", args.join(", "));

        let errors = error_strings(&source);

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0],
            "[line 1] Error at '255': Can't have more than 255 arguments."
        );
        assert_eq!(errors[1], "[line 2] Error at ';': Expect expression.");
    }

    #[test]
    fn super_requires_method_name() {
        assert_eq!(
            error_strings("class A < B { m() { super; } }"),
            vec!["[line 1] Error at ';': Expect '.' after 'super'."]
        );
    }
}
