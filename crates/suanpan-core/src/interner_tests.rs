use crate::interner::Interner;

#[test]
fn intern_dedupes() {
    let mut interner = Interner::new();
    let a = interner.intern("+");
    let b = interner.intern("8");
    let c = interner.intern("+");
    assert_eq!(a, c);
    assert_ne!(a, b);
    assert_eq!(interner.len(), 2);
}

#[test]
fn symbols_are_table_indices() {
    let mut interner = Interner::new();
    assert_eq!(interner.intern(".code").as_u32(), 0);
    assert_eq!(interner.intern("8").as_u32(), 1);
    assert_eq!(interner.intern("3").as_u32(), 2);
    assert_eq!(interner.intern("8").as_u32(), 1);
}

#[test]
fn resolve_round_trips() {
    let mut interner = Interner::new();
    let sym = interner.intern("sqrt");
    assert_eq!(interner.resolve(sym), "sqrt");
}

#[test]
fn iter_preserves_insertion_order() {
    let mut interner = Interner::new();
    for s in [".code", "8", "3", "+"] {
        interner.intern(s);
    }
    let collected: Vec<&str> = interner.iter().collect();
    assert_eq!(collected, vec![".code", "8", "3", "+"]);
}
