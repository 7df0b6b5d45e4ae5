#[cfg(test)]
mod interpreter_tests {
    use rox::{Lox, Outcome};

    /// Run `source` in a fresh session, returning what it printed and how
    /// it ended.
    fn run(source: &str) -> (String, Outcome) {
        let mut lox = Lox::new(Vec::new());
        let outcome = lox.run(source);
        let output = String::from_utf8(lox.into_output()).expect("utf-8 output");

        (output, outcome)
    }

    fn output_of(source: &str) -> String {
        let (output, outcome) = run(source);
        assert!(
            outcome.is_success(),
            "program failed: {:?}\noutput so far: {}",
            outcome,
            output
        );
        output
    }

    fn runtime_error_of(source: &str) -> (String, String) {
        match run(source) {
            (output, Outcome::RuntimeError(e)) => (output, e.to_string()),
            (_, other) => panic!("expected a runtime error, got {:?}", other),
        }
    }

    #[test]
    fn print_has_no_implicit_newline() {
        assert_eq!(output_of("print 1; print \"a\"; print nil; print true;"), "1aniltrue");
    }

    #[test]
    fn block_shadowing_leaves_outer_binding_alone() {
        assert_eq!(
            output_of("var a = 1; { var a = 2; print a; } print a;"),
            "21"
        );
    }

    #[test]
    fn arithmetic_comparison_and_equality() {
        assert_eq!(output_of("print 1 + 2 * 3;"), "7");
        assert_eq!(output_of("print (1 + 2) * 3 / 2;"), "4.5");
        assert_eq!(output_of("print -(3 - 5);"), "2");
        assert_eq!(output_of("print 2 >= 2 == !(1 > 2);"), "true");
        assert_eq!(output_of("print nil == nil; print nil == false;"), "truefalse");
        assert_eq!(output_of("print \"a\" + \"b\" == \"ab\";"), "true");
        assert_eq!(output_of("print 1 == \"1\";"), "false");
    }

    #[test]
    fn plus_coerces_numbers_next_to_strings() {
        assert_eq!(output_of("print \"n=\" + 3;"), "n=3");
        assert_eq!(output_of("print 2.5 + \"x\";"), "2.5x");
    }

    #[test]
    fn plus_rejects_other_mixes() {
        let (_, message) = runtime_error_of("print true + 1;");
        assert_eq!(message, "Operands must be two numbers or strings.\n[line 1]");
    }

    #[test]
    fn arithmetic_on_non_numbers_fails() {
        let (_, message) = runtime_error_of("print 1;\nprint \"a\" * 2;");
        assert_eq!(message, "Operands must be numbers.\n[line 2]");

        let (_, message) = runtime_error_of("print -\"a\";");
        assert_eq!(message, "Operand must be a number.\n[line 1]");
    }

    #[test]
    fn truthiness_of_zero_and_empty_string() {
        assert_eq!(
            output_of("if (0) print \"zero\"; if (\"\") print \"empty\"; if (nil) print \"nil\"; else print \"no\";"),
            "zeroemptyno"
        );
    }

    #[test]
    fn logical_operators_return_deciding_operand() {
        assert_eq!(output_of("print nil or \"yes\";"), "yes");
        assert_eq!(output_of("print 1 and 2;"), "2");
        assert_eq!(output_of("print false and missing();"), "false");
        assert_eq!(output_of("print \"first\" or missing();"), "first");
    }

    #[test]
    fn while_and_for_loops() {
        assert_eq!(
            output_of("var i = 0; while (i < 3) { print i; i = i + 1; }"),
            "012"
        );
        assert_eq!(
            output_of("for (var i = 0; i < 5; i = i + 2) print i;"),
            "024"
        );
    }

    #[test]
    fn fibonacci_with_recursion() {
        assert_eq!(
            output_of(
                "fun fib(n) { if (n <= 1) return n; return fib(n - 2) + fib(n - 1); }\n\
                 for (var i = 0; i < 10; i = i + 1) print fib(i) + \" \";"
            ),
            "0 1 1 2 3 5 8 13 21 34 "
        );
    }

    #[test]
    fn return_exits_nested_blocks_and_loops() {
        assert_eq!(
            output_of(
                "fun find() { var i = 0; while (true) { { if (i == 3) return i; } i = i + 1; } }\n\
                 print find();"
            ),
            "3"
        );
    }

    #[test]
    fn function_without_return_yields_nil() {
        assert_eq!(output_of("fun f() {} print f();"), "nil");
    }

    #[test]
    fn counters_capture_independent_state() {
        let source = "
            fun makeCounter() {
              var i = 0;
              fun count() {
                i = i + 1;
                print i;
              }
              return count;
            }

            var counter = makeCounter();
            counter();
            counter();
            var other = makeCounter();
            other();
            counter();
        ";

        assert_eq!(output_of(source), "1213");
    }

    #[test]
    fn closures_share_mutations_of_captured_frame() {
        let source = "
            var get; var set;
            {
              var value = \"before\";
              fun g() { return value; }
              fun s(v) { value = v; }
              get = g; set = s;
            }
            set(\"after\");
            print get();
        ";

        assert_eq!(output_of(source), "after");
    }

    #[test]
    fn closure_binds_to_declaration_scope_not_later_shadow() {
        let source = "
            var a = \"global\";
            {
              fun showA() { print a; }
              showA();
              var a = \"block\";
              showA();
            }
        ";

        assert_eq!(output_of(source), "globalglobal");
    }

    #[test]
    fn globals_are_late_bound() {
        assert_eq!(
            output_of("fun early() { return later(); } fun later() { return \"ok\"; } print early();"),
            "ok"
        );
    }

    #[test]
    fn callable_and_class_rendering() {
        assert_eq!(
            output_of("fun f() {} class C { m() {} } print f; print clock; print C; print C(); print C().m;"),
            "<fn f><native fn clock>C<C instance><fn m>"
        );
    }

    #[test]
    fn clock_returns_seconds() {
        assert_eq!(output_of("var t = clock(); print t > 1000000000;"), "true");
    }

    #[test]
    fn arity_mismatch_aborts_the_run() {
        let (output, message) = runtime_error_of(
            "fun add(a, b) { return a + b; }\nprint \"before\";\nprint add(1);\nprint \"after\";",
        );

        assert_eq!(output, "before");
        assert_eq!(message, "Expected 2 arguments but got 1.\n[line 3]");
    }

    #[test]
    fn arity_mismatch_exit_code_is_70() {
        let (_, outcome) = run("fun add(a, b) {} add(1);");
        assert_eq!(outcome.exit_code(), 70);
    }

    #[test]
    fn calling_a_non_callable_fails() {
        let (_, message) = runtime_error_of("var x = \"str\"; x();");
        assert_eq!(message, "Can only call functions and classes.\n[line 1]");
    }

    #[test]
    fn undefined_variable_fails() {
        let (_, message) = runtime_error_of("print missing;");
        assert_eq!(message, "Undefined variable 'missing'.\n[line 1]");

        let (_, message) = runtime_error_of("missing = 1;");
        assert_eq!(message, "Undefined variable 'missing'.\n[line 1]");
    }

    #[test]
    fn syntax_errors_prevent_execution() {
        let (output, outcome) = run("print \"ran\";\nprint 1\nprint 2\n");

        assert_eq!(output, "");
        assert_eq!(outcome.exit_code(), 65);
        match outcome {
            Outcome::StaticErrors(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected static errors, got {:?}", other),
        }
    }

    #[test]
    fn resolution_errors_prevent_execution() {
        let (output, outcome) = run("print \"ran\";\n{ var a = 1; var a = 2; }");

        assert_eq!(output, "");
        assert_eq!(outcome.exit_code(), 65);
        assert_eq!(
            outcome.diagnostics()[0].to_string(),
            "[line 2] Error at 'a': Already a variable with this name in this scope."
        );
    }

    #[test]
    fn lex_errors_prevent_execution() {
        let (output, outcome) = run("print 1; @");

        assert_eq!(output, "");
        assert_eq!(outcome.exit_code(), 65);
    }

    #[test]
    fn instances_hold_fields_and_methods_see_this() {
        let source = "
            class Person {
              init(name) { this.name = name; }
              greet() { return \"hi \" + this.name; }
            }
            var p = Person(\"ann\");
            print p.greet();
            p.name = \"bob\";
            print p.greet();
        ";

        assert_eq!(output_of(source), "hi annhi bob");
    }

    #[test]
    fn extracted_method_keeps_its_receiver() {
        let source = "
            class Person {
              init() { this.name = \"jane\"; }
              sayName() { print this.name; }
            }
            var jane = Person();
            var bill = Person();
            bill.name = \"bill\";
            bill.sayName = jane.sayName;
            bill.sayName();
        ";

        assert_eq!(output_of(source), "jane");
    }

    #[test]
    fn initializer_always_returns_the_instance() {
        let source = "
            class Box {
              init(v) { this.v = v; return; }
            }
            var b = Box(7);
            print b.v;
            print b.init(9).v;
            print b.v;
        ";

        assert_eq!(output_of(source), "799");
    }

    #[test]
    fn fields_shadow_methods() {
        let source = "
            class A { m() { return \"method\"; } }
            var a = A();
            a.m = \"field\";
            print a.m;
        ";

        assert_eq!(output_of(source), "field");
    }

    #[test]
    fn undefined_property_fails() {
        let (_, message) = runtime_error_of("class A {}\nA().nope;");
        assert_eq!(message, "Undefined property 'nope'.\n[line 2]");
    }

    #[test]
    fn property_access_on_non_instance_fails() {
        let (_, message) = runtime_error_of("var n = 1; print n.x;");
        assert_eq!(message, "Only instances have properties.\n[line 1]");

        let (_, message) = runtime_error_of("var n = 1; n.x = 2;");
        assert_eq!(message, "Only instances have fields.\n[line 1]");
    }

    #[test]
    fn inherited_methods_are_found() {
        let source = "
            class Doughnut { cook() { print \"Fry until golden brown.\"; } }
            class BostonCream < Doughnut {}
            BostonCream().cook();
        ";

        assert_eq!(output_of(source), "Fry until golden brown.");
    }

    #[test]
    fn super_dispatch_uses_defining_class() {
        let source = "
            class A { method() { print \"A method\"; } }
            class B < A {
              method() { print \"B method\"; }
              test() { super.method(); }
            }
            class C < B {}
            C().test();
        ";

        assert_eq!(output_of(source), "A method");
    }

    #[test]
    fn super_init_chains_initializers() {
        let source = "
            class Doughnut {
              init() { this.name = \"plain\"; print \"Doughnut init \"; }
            }
            class BostonCream < Doughnut {
              init() { super.init(); print \"BostonCream init \"; print this.name; }
            }
            BostonCream();
        ";

        assert_eq!(output_of(source), "Doughnut init BostonCream init plain");
    }

    #[test]
    fn inherited_init_sets_class_arity() {
        let (_, message) = runtime_error_of("class A { init(a, b) {} }\nclass B < A {}\nB(1);");
        assert_eq!(message, "Expected 2 arguments but got 1.\n[line 3]");
    }

    #[test]
    fn superclass_must_be_a_class() {
        let (_, message) = runtime_error_of("var NotAClass = 1;\nclass B < NotAClass {}");
        assert_eq!(message, "Superclass must be a class.\n[line 2]");
    }

    #[test]
    fn identity_equality_for_reference_values() {
        let source = "
            class A {}
            var a = A();
            var b = a;
            fun f() {}
            print a == b;
            print a == A();
            print f == f;
            print A == A;
        ";

        assert_eq!(output_of(source), "truefalsetruetrue");
    }

    #[test]
    fn session_keeps_globals_between_runs() {
        let mut lox = Lox::new(Vec::new());

        assert!(lox.run("var count = 1; fun bump() { count = count + 1; }").is_success());
        assert!(matches!(lox.run("print nope"), Outcome::StaticErrors(_)));
        assert!(lox.run("bump(); print count;").is_success());
        assert!(matches!(lox.run("undefinedFn();"), Outcome::RuntimeError(_)));
        assert!(lox.run("bump(); print count;").is_success());

        assert_eq!(String::from_utf8(lox.into_output()).unwrap(), "23");
    }

    #[test]
    fn runtime_error_inside_nested_frames_leaves_session_at_globals() {
        let mut lox = Lox::new(Vec::new());

        assert!(lox
            .run("var g = 1; fun outer() { var local = 2; { var inner = 3; undefined(); } }")
            .is_success());
        assert!(matches!(lox.run("outer();"), Outcome::RuntimeError(_)));
        assert!(lox.run("var z = 3; print z; print g;").is_success());

        // the aborted call's frames are gone
        assert!(matches!(lox.run("print local;"), Outcome::RuntimeError(_)));

        assert_eq!(lox.output().as_slice(), b"31");
    }

    #[test]
    fn session_closures_survive_across_runs() {
        let mut lox = Lox::new(Vec::new());

        assert!(lox
            .run("fun make() { var n = 0; fun inc() { n = n + 1; return n; } return inc; } var c = make();")
            .is_success());
        assert!(lox.run("c(); print c();").is_success());

        assert_eq!(lox.output().as_slice(), b"2");
    }

    #[test]
    fn negative_zero_keeps_its_sign() {
        assert_eq!(output_of("print -0; print 0;"), "-00");
    }

    #[test]
    fn division_by_zero_follows_ieee() {
        assert_eq!(output_of("print 1 / 0 > 1000;"), "true");
    }
}
