//! CPU rendition of a basic forward vertex stage: model/view/projection
//! transform, uncorrected normal transform, texture coordinate passthrough.

pub mod graphics;
