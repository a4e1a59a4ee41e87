//! Whole-pipeline test: source text in, exact TAC listing and symbol table
//! out.

use decafc::compile;

const SRC: &str = "class Fib {
    static int fib(int n) {
        int a, b;
        if (n < 2) { return n; }
        a = fib(n - 1);
        b = fib(n - 2);
        return a + b;
    }

    static void main() {
        int i;
        for (i = 0; i < 10; i++) {
            write(fib(i));
        }
        writeln();
    }
}";

const EXPECTED_TAC: &str = "\
GOTO main
fib:
FPARAM n
VAR a
VAR b
if n < 2 goto rel_true_0
t0 = 0
GOTO rel_end_0
rel_true_0:
t0 = 1
rel_end_0:
if t0 != 0 goto true_block_1
GOTO if_end_1
true_block_1:
fib = n
RETURN
if_end_1:
VAR t1
t1 = n - 1
APARAM t1
CALL fib
a = fib
VAR t2
t2 = n - 2
APARAM t2
CALL fib
b = fib
VAR t3
t3 = a + b
fib = t3
RETURN
main:
VAR i
i = 0
for_expr_2:
if i < 10 goto rel_true_3
t4 = 0
GOTO rel_end_3
rel_true_3:
t4 = 1
rel_end_3:
if t4 == 0 goto for_end_2
APARAM i
CALL fib
APARAM fib
CALL write
for_incr_2:
i = i + 1
GOTO for_expr_2
for_end_2:
CALL writeln
RETURN
";

const EXPECTED_SYMBOLS: &[&str] = &[
    "(fib,,Method,int,int)",
    "(main,,Method,void,)",
    "(a,fib,Variable,int,)",
    "(b,fib,Variable,int,)",
    "(fib,fib,Method,int,int)",
    "(n,fib,Variable,int,)",
    "(i,main,Variable,int,)",
    "(main,main,Method,void,)",
];

#[test]
fn compile_fib() {
    let compilation = compile(SRC).unwrap();

    assert_eq!(EXPECTED_TAC, compilation.tac.to_string());
    assert!(compilation.warnings.is_empty(), "{:?}", compilation.warnings);

    let entries: Vec<String> = compilation
        .table
        .entries()
        .map(|entry| entry.to_string())
        .collect();
    assert_eq!(EXPECTED_SYMBOLS, entries.as_slice());
}

#[test]
fn compile_is_deterministic() {
    let first = compile(SRC).unwrap();
    let second = compile(SRC).unwrap();
    assert_eq!(first.tac.to_string(), second.tac.to_string());
    assert_eq!(first.program.to_string(), second.program.to_string());
}
