use crate::stack::ExecutionStack;
use crate::value::Value;

fn int(stack: &ExecutionStack, index: usize) -> i64 {
    match stack.get(index) {
        Some(Value::Integer(i)) => i64::try_from(i).unwrap(),
        other => panic!("expected an integer at {index}, got {other:?}"),
    }
}

fn filled(values: &[i64]) -> ExecutionStack {
    let mut stack = ExecutionStack::new();
    for &v in values {
        stack.push(Value::from(v));
    }
    stack
}

#[test]
fn with_nil_preallocates_empty_slots() {
    let stack = ExecutionStack::with_nil(3);
    assert_eq!(stack.len(), 3);
    assert!(matches!(stack.get(2), Some(Value::Nil)));
    assert!(stack.get(3).is_none());
}

#[test]
fn push_and_pop_are_lifo() {
    let mut stack = filled(&[1, 2]);
    assert!(matches!(stack.pop(), Some(Value::Integer(i)) if i == 2.into()));
    assert!(matches!(stack.pop(), Some(Value::Integer(i)) if i == 1.into()));
    assert!(stack.pop().is_none());
    assert!(stack.is_empty());
}

#[test]
fn set_overwrites_in_place() {
    let mut stack = ExecutionStack::with_nil(2);
    stack.set(1, Value::from(9));
    assert_eq!(int(&stack, 1), 9);
    assert!(matches!(stack.get(0), Some(Value::Nil)));
}

#[test]
fn duplicate_copies_to_the_top() {
    let mut stack = filled(&[1, 2, 3]);
    stack.duplicate(0);
    assert_eq!(stack.len(), 4);
    assert_eq!(int(&stack, 3), 1);
    assert_eq!(int(&stack, 0), 1);
}

#[test]
fn exchange_swaps_with_the_top() {
    let mut stack = filled(&[1, 2, 3]);
    stack.exchange(0);
    assert_eq!(int(&stack, 0), 3);
    assert_eq!(int(&stack, 2), 1);
}

#[test]
fn insert_moves_the_top_down() {
    let mut stack = filled(&[1, 2, 3]);
    stack.insert(0);
    assert_eq!(int(&stack, 0), 3);
    assert_eq!(int(&stack, 1), 1);
    assert_eq!(int(&stack, 2), 2);
}

#[test]
fn remove_shifts_the_rest_down() {
    let mut stack = filled(&[1, 2, 3]);
    let taken = stack.remove(1);
    assert!(matches!(taken, Value::Integer(i) if i == 2.into()));
    assert_eq!(stack.len(), 2);
    assert_eq!(int(&stack, 1), 3);
}

#[test]
fn resize_grows_with_nil_and_truncates() {
    let mut stack = filled(&[1]);
    stack.resize(3);
    assert!(matches!(stack.get(2), Some(Value::Nil)));
    stack.resize(0);
    assert!(stack.is_empty());
}
