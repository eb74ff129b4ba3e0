use pyone::executor::{ExecutionPlan, GeneratedProgram, Import, Mode};
use pyone::parser::{transform, Emitted};
use pyone::{dispatch, Config, ConfigError, Invocation, Outcome, PyoneError, ScriptError};

// Helper to expand a script with the default indent width
fn expand(script: &str) -> Vec<String> {
    transform(script)
        .expect("script should transform")
        .render_lines(4)
}

// Helper to build an invocation for a script
fn invocation(script: &str) -> Invocation {
    Invocation {
        script: script.to_string(),
        ..Invocation::default()
    }
}

#[cfg(test)]
mod transform_tests {
    use super::*;

    #[test]
    fn test_plain_expression_unchanged() {
        let program = transform("2+3.4*5").unwrap();
        assert_eq!(program.render(4), "2+3.4*5");
        assert!(program.is_expression(), "Bare expression should classify as expression");
    }

    #[test]
    fn test_semicolons_split_statements() {
        assert_eq!(expand("A;B;C"), vec!["A", "B", "C"]);
        assert_eq!(expand("x = 1 ;  y = 2"), vec!["x = 1", "y = 2"]);
    }

    #[test]
    fn test_block_indents_one_level() {
        assert_eq!(expand("A{B;C}"), vec!["A:", "    B", "    C"]);
    }

    #[test]
    fn test_nested_blocks() {
        assert_eq!(
            expand("A{B{C{D}}}"),
            vec!["A:", "    B:", "        C:", "            D"]
        );
    }

    #[test]
    fn test_dedent_after_block() {
        assert_eq!(
            expand("for i in range(3){print(i)}print('done')"),
            vec!["for i in range(3):", "    print(i)", "print('done')"]
        );
    }

    #[test]
    fn test_adjacent_blocks_no_blank_lines() {
        assert_eq!(
            expand("if a{b}else{c}"),
            vec!["if a:", "    b", "else:", "    c"]
        );
        assert_eq!(expand("A{B};;C"), vec!["A:", "    B", "C"]);
    }

    #[test]
    fn test_existing_colon_not_doubled() {
        assert_eq!(expand("if x: {y}"), vec!["if x:", "    y"]);
    }

    #[test]
    fn test_structure_inside_literals_is_inert() {
        assert_eq!(expand(r#"x="a;b{c}""#), vec![r#"x="a;b{c}""#]);
        assert_eq!(
            expand(r#"print('}'); s="""{;}""""#),
            vec!["print('}')", r#"s="""{;}""""#]
        );
        assert_eq!(
            expand(r#"if x{print("a\";{")}"#),
            vec!["if x:", r#"    print("a\";{")"#]
        );
    }

    #[test]
    fn test_comment_hides_structure() {
        assert_eq!(expand("x=1 # c;d}\ny=2"), vec!["x=1 # c;d}", "y=2"]);
    }

    #[test]
    fn test_backslash_continuation() {
        assert_eq!(
            expand("for i in range(3){ \\\n        print(i)}"),
            vec!["for i in range(3):", "    print(i)"]
        );
        let program = transform("1 + \\\n  2").unwrap();
        assert_eq!(program.render(4), "1 + 2");
        assert!(program.is_expression());
    }

    #[test]
    fn test_class_with_methods() {
        let script = r#"class P{z=0; def f(self,t){ if(t=="tr"){self.r=[]} elif(t=="td"){self.z=1}} def g(self){pass}}"#;
        assert_eq!(
            expand(script),
            vec![
                "class P:",
                "    z=0",
                "    def f(self,t):",
                r#"        if(t=="tr"):"#,
                "            self.r=[]",
                r#"        elif(t=="td"):"#,
                "            self.z=1",
                "    def g(self):",
                "        pass",
            ]
        );
    }

    #[test]
    fn test_semicolon_makes_script() {
        let program = transform("a;").unwrap();
        assert_eq!(program.lines.len(), 1);
        assert!(!program.is_expression(), "`;` should force script mode");
    }

    #[test]
    fn test_custom_indent_width() {
        let program = transform("A{B}").unwrap();
        assert_eq!(program.render_lines(2), vec!["A:", "  B"]);
    }
}

#[cfg(test)]
mod each_line_tests {
    use super::*;

    #[test]
    fn test_each_line_expansion() {
        assert_eq!(
            expand("EL{print(s)}"),
            vec![
                "with fileinput.input() as _EL:",
                "    for (L, S) in enumerate(_EL):",
                "        s = S.strip()",
                "        F = s.split(DELIM)",
                "        I = [toint(v) for v in F]",
                "        print(s)",
            ]
        );
    }

    #[test]
    fn test_each_line_is_tagged() {
        let program = transform("n=0;EL{n+=1};print(n)").unwrap();
        assert!(program.has_each_line());
        assert_eq!(
            program.lines,
            vec![
                Emitted::Statement { level: 0, text: "n=0".into() },
                Emitted::EachLine { level: 0 },
                Emitted::Statement { level: 2, text: "n+=1".into() },
                Emitted::Statement { level: 0, text: "print(n)".into() },
            ]
        );
    }

    #[test]
    fn test_each_line_prefix_split_off() {
        let lines = expand("t=0 EL{t+=1}");
        assert_eq!(lines[0], "t=0");
        assert_eq!(lines[1], "with fileinput.input() as _EL:");
    }

    #[test]
    fn test_each_line_needs_whole_word() {
        assert_eq!(expand("FOEL{x}"), vec!["FOEL:", "    x"]);
        assert_eq!(expand("print('EL{x}')"), vec!["print('EL{x}')"]);
    }

    #[test]
    fn test_each_line_must_touch_brace() {
        assert_eq!(expand("EL {x}"), vec!["EL:", "    x"]);
        assert!(!transform("EL {x}").unwrap().has_each_line());
    }

    #[test]
    fn test_each_line_with_nested_block() {
        let lines = expand("EL{if L%2{print(s)}}");
        assert_eq!(lines[5], "        if L%2:");
        assert_eq!(lines[6], "            print(s)");
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_extra_close_brace() {
        assert_eq!(
            transform("a}{").unwrap_err(),
            ScriptError::UnbalancedBrace { offset: 1 }
        );
        assert!(matches!(
            transform("A{B}}"),
            Err(ScriptError::UnbalancedBrace { offset: 4 })
        ));
    }

    #[test]
    fn test_missing_close_brace() {
        assert_eq!(
            transform("a{b{c}").unwrap_err(),
            ScriptError::UnclosedBrace { offset: 1 }
        );
    }

    #[test]
    fn test_unterminated_literal() {
        assert!(matches!(
            transform("print('abc;def)"),
            Err(ScriptError::UnterminatedLiteral { offset: 6, .. })
        ));
        assert!(matches!(
            transform(r#"x="""abc"#),
            Err(ScriptError::UnterminatedLiteral { offset: 2, .. })
        ));
    }

    #[test]
    fn test_block_without_header() {
        assert_eq!(
            transform("{a}").unwrap_err(),
            ScriptError::MissingBlockHeader { offset: 0 }
        );
        assert!(matches!(
            transform("x=1; {a}"),
            Err(ScriptError::MissingBlockHeader { offset: 5 })
        ));
    }

    #[test]
    fn test_second_each_line_rejected() {
        assert_eq!(
            transform("EL{a};EL{b}").unwrap_err(),
            ScriptError::RepeatedEachLine { offset: 8 }
        );
        assert!(matches!(
            transform("EL{EL{a}}"),
            Err(ScriptError::RepeatedEachLine { .. })
        ));
    }

    #[test]
    fn test_nesting_cap() {
        let deep = format!("{}x{}", "if 1{".repeat(101), "}".repeat(101));
        assert!(matches!(
            transform(&deep),
            Err(ScriptError::NestingTooDeep { max: 100, .. })
        ));
        let ok = format!("{}x{}", "if 1{".repeat(100), "}".repeat(100));
        assert!(transform(&ok).is_ok());
    }
}

#[cfg(test)]
mod dispatch_tests {
    use super::*;

    #[test]
    fn test_imports_precede_body() {
        let mut inv = invocation("A;B");
        inv.imports = vec!["os".to_string()];
        let generated = inv.generate(&Config::default()).unwrap();
        assert_eq!(generated.text(), "import os\nA\nB");
        assert_eq!(generated.mode, Mode::Script);
    }

    #[test]
    fn test_wildcard_imports_split_on_commas() {
        let mut inv = invocation("x");
        inv.imports = vec!["sys".to_string()];
        inv.from_imports = vec!["urllib.request, html.parser".to_string()];
        let config = Config {
            imports: vec!["re".to_string()],
            ..Config::default()
        };
        let generated = inv.generate(&config).unwrap();
        assert_eq!(
            generated.header,
            vec![
                "import re",
                "import sys",
                "from urllib.request import *",
                "from html.parser import *",
            ]
        );
        assert_eq!(generated.mode, Mode::Expression, "Imports should not change classification");
    }

    #[test]
    fn test_plan_classification() {
        let expr = transform("2+3.4*5").unwrap();
        let plan = ExecutionPlan::new(&expr, Vec::new(), false);
        assert_eq!(plan.mode, Mode::Expression);

        let script = transform("x=1;print(x)").unwrap();
        let plan = ExecutionPlan::new(&script, vec![Import::Module("os".into())], true);
        assert_eq!(plan.mode, Mode::Script);
        assert!(plan.debug);

        let generated = GeneratedProgram::assemble(&plan, &script, 4);
        assert_eq!(generated.header_text(), "import os");
        assert_eq!(generated.body_text(), "x=1\nprint(x)");
    }

    #[test]
    fn test_debug_never_executes() {
        let mut inv = invocation("A{B;C}");
        inv.debug = true;
        // An interpreter that cannot exist: debug mode must not touch it.
        let config = Config {
            python: "pyone-test-no-such-interpreter".to_string(),
            ..Config::default()
        };

        let mut out = Vec::new();
        let outcome = dispatch(&inv, &config, &mut out).unwrap();
        assert_eq!(outcome, Outcome::Dumped);
        assert_eq!(String::from_utf8(out).unwrap(), "A:\n    B\n    C\n");
    }

    #[test]
    fn test_transform_error_stops_before_execution() {
        let inv = invocation("a}");
        let config = Config {
            python: "pyone-test-no-such-interpreter".to_string(),
            ..Config::default()
        };
        let mut out = Vec::new();
        assert!(matches!(
            dispatch(&inv, &config, &mut out),
            Err(PyoneError::Script(ScriptError::UnbalancedBrace { .. }))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_missing_interpreter_reported() {
        let inv = invocation("1");
        let config = Config {
            python: "pyone-test-no-such-interpreter".to_string(),
            ..Config::default()
        };
        let mut out = Vec::new();
        assert!(matches!(
            dispatch(&inv, &config, &mut out),
            Err(PyoneError::Spawn { .. })
        ));
    }

    #[test]
    fn test_empty_delimiter_stops_before_execution() {
        let mut inv = invocation("EL{print(F)}");
        inv.delimiter = Some(String::new());
        assert!(matches!(
            inv.driver(&Config::default()),
            Err(PyoneError::Config(ConfigError::EmptyDelimiter))
        ));
    }

    #[test]
    fn test_driver_embeds_script_safely() {
        let inv = invocation(r#"print("@BODY@ \" ' \\")"#);
        let driver = inv.driver(&Config::default()).unwrap();
        assert!(driver.contains("DELIM = None"));
        assert!(driver.contains(r#"'single'"#) || driver.contains(r#""single""#));
        assert_eq!(driver.matches("@BODY@").count(), 2, "User text must not be re-substituted");
    }
}
