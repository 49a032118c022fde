mod parallel;
pub use parallel::{parallel, parallel_with_limit};

mod invproject;
pub use invproject::inv_project;

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn compose_then_lift() {
        let left = Generator::builder()
            .with_transitions([("0", "a", "1"), ("1", "b", "0")])
            .with_initial("0")
            .with_marked(["0"])
            .build();
        let right = Generator::builder()
            .with_transitions([("0", "b", "1"), ("1", "c", "0")])
            .with_initial("0")
            .with_marked(["0"])
            .build();

        let product = parallel(&left, &right);
        assert_eq!(product.alphabet().len(), 3);

        let mut lifted = left.clone();
        inv_project(&mut lifted, product.alphabet());
        assert_eq!(lifted.alphabet(), product.alphabet());
    }
}
