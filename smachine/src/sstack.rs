use crate::snumber::Number;

#[derive(Default, Debug, Clone)]
pub struct SStack {
    words: Vec<u16>,
}

impl SStack {
    pub fn new() -> SStack {
        SStack::default()
    }

    pub fn push(&mut self, val: u16) {
        self.words.push(val);
    }

    /// Popped values are always literals.
    pub fn pop(&mut self) -> Option<Number> {
        self.words.pop().map(Number::Literal)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Bottom first, top last.
    pub fn as_slice(&self) -> &[u16] {
        &self.words
    }
}

#[cfg(test)]
mod tests {
    use super::SStack;
    use crate::snumber::Number;
    use rand::Rng;

    #[test]
    fn pops_in_reverse_push_order() {
        let mut rng = rand::thread_rng();
        let mut stack = SStack::new();
        let pushed: Vec<u16> = (0..200).map(|_| rng.gen_range(0, 32768)).collect();

        for v in &pushed {
            stack.push(*v);
        }
        assert_eq!(stack.len(), pushed.len());

        for v in pushed.iter().rev() {
            assert_eq!(stack.pop(), Some(Number::Literal(*v)));
        }
        assert!(stack.is_empty());
    }

    #[test]
    fn empty_pop_is_none() {
        let mut stack = SStack::new();
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.len(), 0);
    }
}
