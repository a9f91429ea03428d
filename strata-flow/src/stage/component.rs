/// Item types flowing through a stage.
pub trait StageComponent {
    type Input: Send + 'static;
    type Output: Send + 'static;
}
