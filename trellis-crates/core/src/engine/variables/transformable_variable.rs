/// Variables which can be wrapped in an [`AffineView`](super::AffineView).
///
/// Transforming a view yields a view over the same underlying domain with the transformations
/// composed, never a view of a view.
pub trait TransformableVariable<View> {
    /// The variable `scale * self`.
    ///
    /// Only multiples of `scale` are in the domain of the result: if `dom(x) = {1, 2}` then
    /// `dom(x.scaled(2)) = {2, 4}`. Panics if `scale` is 0.
    fn scaled(&self, scale: i32) -> View;

    /// The variable `self + offset`.
    fn offset(&self, offset: i32) -> View;

    /// The variable `-self`.
    fn negated(&self) -> View {
        self.scaled(-1)
    }
}
