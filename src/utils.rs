use std::iter::Peekable;

pub trait StringUtils {
    fn as_bytes_vec(&self) -> Vec<u8>;

    fn from_vec(bytes: Vec<u8>) -> Self;
}

impl StringUtils for String {
    fn as_bytes_vec(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    fn from_vec(bytes: Vec<u8>) -> Self {
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

pub trait IteratorUtils<'a, T: Copy + 'a>: Iterator<Item = &'a T> {
    /// Takes items up to the first one rejected by `predicate`, which is consumed and dropped.
    fn take_while_copy(&mut self, predicate: impl FnMut(&&'a T) -> bool) -> Vec<T>
    where
        Self: Sized,
    {
        self.by_ref().take_while(predicate).copied().collect()
    }
}

impl<'a, T: Copy + 'a, I: Iterator<Item = &'a T>> IteratorUtils<'a, T> for I {}

pub fn skip_whitespace<'a>(iterator: &mut Peekable<impl Iterator<Item = &'a u8>>) {
    while iterator.next_if(|byte| matches!(**byte, b' ' | b'\t')).is_some() {}
}
