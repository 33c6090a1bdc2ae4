use crate::scanner::Scanner;

#[test]
fn test_extremes() {
    let mut s = Scanner::from_str("just a test buffer@");
    assert_eq!(s.prev(), None);
    assert_eq!(s.next(), Some('j'));
    assert_eq!(s.prev(), None);
    while s.next() != Some('@') {}
    assert_eq!(s.curr(), Some('@'));
    assert_eq!(s.prev(), Some('r'));
    assert_eq!(s.prev(), Some('e'));
    assert_eq!(s.next(), Some('r'));
    assert_eq!(s.next(), Some('@'));
    assert_eq!(s.next(), None);
    assert_eq!(s.next(), None);
}

#[test]
fn test_extract() {
    let mut s = Scanner::from_str("just a test buffer@");
    for _ in 0..4 { assert!(s.next().is_some()); }
    assert_eq!(s.extract_string(), "just");
    assert_eq!(s.peek(), Some(' '));
    assert_eq!(s.prev(), None);
    assert_eq!(s.next(), Some(' '));
    for _ in 0..6 { assert!(s.next().is_some()); }
    assert_eq!(s.extract_string(), " a test");
    assert_eq!(s.next(), Some(' '));
}

#[test]
fn test_extract_at_eof() {
    let mut s = Scanner::from_str("ab");
    while s.next().is_some() {}
    assert_eq!(s.extract_string(), "ab");
    assert_eq!(s.next(), None);
}

#[test]
fn test_accept() {
    let mut s = Scanner::from_str("heey  you!");
    assert!(!s.skip_ws());
    assert_eq!(s.prev(), None);
    assert_eq!(s.accept_any_char("he"), Some('h'));
    assert_eq!(s.curr(), Some('h'));
    assert_eq!(s.accept_any_char("he"), Some('e'));
    assert_eq!(s.accept_any_char("hye"), Some('e'));
    assert_eq!(s.accept_any_char("e"), None);
    assert_eq!(s.curr(), Some('e'));
    assert!(s.accept_char('y'));
    assert!(s.skip_ws());
    assert!(!s.skip_ws());
    assert_eq!(s.curr(), Some(' '));
    assert_eq!(s.peek(), Some('y'));
    assert_eq!(s.next(), Some('y'));
}

#[test]
fn test_generic_items() {
    let mut s = Scanner::new(vec![1, 2, 3, 10, 11].into_iter());
    assert!(s.skip_all_if(|n| *n < 10));
    assert_eq!(s.extract(), vec![1, 2, 3]);
    assert_eq!(s.accept(&10), Some(10));
    assert_eq!(s.accept_any(&[1, 2]), None);
    assert!(s.until_if(|n| *n == 99));
    assert_eq!(s.extract(), vec![10, 11]);
}
