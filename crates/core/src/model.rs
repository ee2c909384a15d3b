/// A callable model that maps an input to an output.
///
/// For fixed-point iteration the model is the iteration function `g`, with
/// `Input = f64` and `Output = f64`. Any closure-like numeric function can be
/// wrapped in a small struct implementing this trait.
pub trait Model {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Calls the model with the given input.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// Models can be borrowed without losing their `Model` implementation.
impl<M: Model + ?Sized> Model for &M {
    type Input = M::Input;
    type Output = M::Output;
    type Error = M::Error;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        (**self).call(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    struct Halve;

    impl Model for Halve {
        type Input = f64;
        type Output = f64;
        type Error = Infallible;

        fn call(&self, input: &f64) -> Result<f64, Infallible> {
            Ok(input / 2.0)
        }
    }

    fn call_twice<M: Model<Input = f64, Output = f64>>(model: M, x: f64) -> f64 {
        let once = model.call(&x).ok().unwrap_or(f64::NAN);
        model.call(&once).ok().unwrap_or(f64::NAN)
    }

    #[test]
    fn reference_forwards_to_model() {
        let model = Halve;
        assert_eq!(call_twice(&model, 8.0), 2.0);
        assert_eq!(call_twice(model, 8.0), 2.0);
    }
}
