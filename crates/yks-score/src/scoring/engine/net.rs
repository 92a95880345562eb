/// Four wrong answers cancel one correct answer; the result never drops below zero.
pub fn compute_net(correct: u32, incorrect: u32) -> f64 {
    (f64::from(correct) - f64::from(incorrect) / 4.0).max(0.0)
}
