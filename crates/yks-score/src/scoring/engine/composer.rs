use crate::scoring::domain::{
    CompositeScore, FirstStageAnswers, ScoreBasis, SecondStageAnswers, Track,
};
use crate::scoring::profile::{FirstStageProfile, ScoringProfile};
use super::EstimateError;

/// Combine first- and second-stage nets into the composite score for `track`.
///
/// An empty `second_stage` map switches to the first-stage-only formula. The arithmetic
/// order below is part of the contract so results stay reproducible across ports.
pub fn compose_score(
    profile: &ScoringProfile,
    track: Track,
    first_stage: &FirstStageAnswers,
    second_stage: &SecondStageAnswers,
    diploma: Option<f64>,
) -> Result<CompositeScore, EstimateError> {
    let first_stage_score = first_stage_score(&profile.first_stage, first_stage)?;
    let diploma_contribution = diploma_contribution(diploma, profile.diploma_factor);

    if second_stage.is_empty() {
        return Ok(CompositeScore {
            track,
            basis: ScoreBasis::FirstStageOnly,
            first_stage_score,
            second_stage_score: 0.0,
            raw_score: first_stage_score,
            placement_score: first_stage_score + diploma_contribution,
        });
    }

    let weights = profile.tracks.get(track);
    let second_stage_raw_total: f64 = second_stage
        .iter()
        .map(|(subject, answers)| answers.net() * weights.coefficient(*subject))
        .sum();

    let raw_score = weights.base_offset
        + first_stage_score * weights.first_stage_weight
        + second_stage_raw_total * weights.second_stage_weight * weights.second_stage_multiplier;
    let second_stage_score =
        raw_score - first_stage_score * weights.first_stage_weight - weights.base_offset;

    Ok(CompositeScore {
        track,
        basis: ScoreBasis::TrackWeighted,
        first_stage_score,
        second_stage_score,
        raw_score,
        placement_score: raw_score + diploma_contribution,
    })
}

/// Track-independent first-stage score; fails when no first-stage answers exist.
pub fn first_stage_score(
    constants: &FirstStageProfile,
    answers: &FirstStageAnswers,
) -> Result<f64, EstimateError> {
    if answers.is_empty() {
        return Err(EstimateError::MissingFirstStageData);
    }

    let raw_total: f64 = answers
        .iter()
        .map(|(subject, answers)| answers.net() * constants.coefficient(*subject))
        .sum();

    Ok(constants.base_offset + raw_total * constants.scaling)
}

pub fn diploma_contribution(diploma: Option<f64>, factor: f64) -> f64 {
    match diploma {
        Some(score) if score > 0.0 => score * factor,
        _ => 0.0,
    }
}
