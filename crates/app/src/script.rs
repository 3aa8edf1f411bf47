//! The intro sequence of "The Big Goodbye".

use show_sequencer_core::{
    AnimationCurve, AssetCatalog, Easing, FrameSequence, GridSpec, Keyframe, ObjectKind,
    ParameterSet, Placement, Ramp, Resolution, Result, Show, TrackAnimation, Transform, Vec3,
};

const TEXTURE_FRAME: &str = "_CurrentTexture";

/// Track the map's notes are put on so they can share one custom model.
const NOTE_TRACK: &str = "myColorNotes";

/// Pause between the end of the auctioneer's line and its repeat.
const LINE_GAP: f64 = 1.5;

/// Word frames of the auctioneer's line, relative to when it starts.
fn auctioneer_line() -> FrameSequence {
    FrameSequence::from_pairs(&[
        (0.0, 1.0),
        (0.5, 2.0),
        (0.75, 3.0),
        (1.0, 4.0),
        (1.5, 5.0),
        (2.5, 0.0),
    ])
}

fn hidden(track: &str) -> Placement {
    Placement::new()
        .on_track(track)
        .with_transform(Transform::default().with_scale(Vec3::ZERO))
}

pub fn build_intro(show: &mut Show, catalog: &AssetCatalog) -> Result<()> {
    show.require("Vivify");

    show.instantiate("skybox", 0.0, Placement::new())?;
    show.assign_object_prefab(ObjectKind::ColorNotes, NOTE_TRACK, "customnote")?;
    show.instantiate("floor", 0.0, Placement::new())?;

    let logo = show.instantiate("ajrlogo", 6.0, hidden("AJRLogo"))?;
    show.animate_track(
        TrackAnimation::new("AJRLogo", 6.0, 9.0)
            .position(vec![
                Keyframe::new([0.0, 1.5, 7.0], 0.0),
                Keyframe::new([0.0, 1.75, 7.0], 0.11).eased(Easing::OutBack),
                Keyframe::new([0.0, 1.875, 5.75], 1.0),
            ])
            .scale(vec![
                Keyframe::new([0.0; 3], 0.0),
                Keyframe::new([0.1058433; 3], 0.11),
                Keyframe::new([0.1058433; 3], 0.75),
                Keyframe::new([0.0; 3], 1.0),
            ])
            .rotation(vec![
                Keyframe::new([-270.0, 0.0, 180.0], 0.0),
                Keyframe::new([-270.0, 0.0, 180.0], 0.8),
                Keyframe::new([-630.0, -180.0, 180.0], 0.95),
            ]),
    )?;
    show.destroy(logo, 15.0)?;

    let title = show.instantiate("thebiggoodbyetext", 7.0, hidden("TBGText"))?;
    show.animate_track(
        TrackAnimation::new("TBGText", 7.0, 8.0)
            .position(vec![
                Keyframe::new([0.0, 0.75, 7.0], 0.0),
                Keyframe::new([0.0, 1.032, 7.0], 0.11).eased(Easing::OutBack),
                Keyframe::new([0.0, 1.25, 5.75], 1.0),
            ])
            .scale(vec![
                Keyframe::new([0.0; 3], 0.0),
                Keyframe::new([0.01; 3], 0.11),
                Keyframe::new([0.01; 3], 0.8),
                Keyframe::new([0.0; 3], 1.0),
            ])
            .rotation(AnimationCurve::new(vec![
                Keyframe::new([0.0; 3], 0.0),
                Keyframe::new([0.0; 3], 0.9),
                Keyframe::new([0.0, -180.0, 0.0], 0.95),
            ])),
    )?;
    show.destroy(title, 15.0)?;

    // Sky and floor darken together as the title leaves.
    let environment = [
        catalog.material("skyboxmaterial")?,
        catalog.material("floormaterial")?,
    ];
    show.fade(
        &environment,
        "_Daylight",
        Ramp::new(14.0, 2.0, 1.0, 0.0).resolution(Resolution::StepSize(0.125)),
    )?;

    let text = catalog.material("transparenttextmaterial")?;
    show.set_material(&text, ParameterSet::single(TEXTURE_FRAME, 0.0), 0.0)?;

    let panels = show.scatter_grid(
        &GridSpec::new(
            16.0,
            15,
            7,
            vec!["auctioneertext".to_string(), "auctioneertext2".to_string()],
        )
        .spacing(1.2, 0.8)
        .depth(3.0)
        .jitter(0.05, 0.1, 8.0)
        .on_track("AuctionPanels"),
    )?;

    let line = auctioneer_line();
    let first = 16.0;
    show.play_sequence(&text, TEXTURE_FRAME, first, &line)?;
    show.play_sequence(&text, TEXTURE_FRAME, first + line.span() + LINE_GAP, &line)?;

    show.stagger_remove(panels, 24.0, 2.5)
}
