//! Reference scenarios for the matrix table, the overwrite stack and
//! parameter schemas, exercised through the public API only.
use glam::{Mat4, Vec3, Vec4};

use render_statecache::math::{MatrixSlot, MatrixTable};
use render_statecache::params::{ParamPackageBuilder, ParamType};
use render_statecache::pipeline::{OverwriteStack, PipelineOverwrite, PipelineSettings};
use render_statecache::RenderError;

fn set_scene(table: &mut MatrixTable, world: Mat4, view: Mat4, projection: Mat4) {
    table.set_matrix(MatrixSlot::World, world).unwrap();
    table.set_matrix(MatrixSlot::View, view).unwrap();
    table.set_matrix(MatrixSlot::Projection, projection).unwrap();
}

#[test]
fn origin_projects_inside_the_frustum() {
    let mut table = MatrixTable::new();
    set_scene(
        &mut table,
        Mat4::IDENTITY,
        Mat4::look_at_rh(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO, Vec3::Y),
        Mat4::perspective_rh(60f32.to_radians(), 1.0, 0.1, 100.0),
    );

    let clip = table.get_matrix(MatrixSlot::WorldViewProjection) * Vec4::new(0.0, 0.0, 0.0, 1.0);
    let ndc = clip.truncate() / clip.w;
    assert!(clip.w > 0.0);
    assert!(ndc.z > -1.0 && ndc.z < 1.0, "ndc z = {}", ndc.z);
    assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
}

#[test]
fn combined_matrix_tracks_every_base_update() {
    let mut table = MatrixTable::new();
    let worlds = [
        Mat4::IDENTITY,
        Mat4::from_translation(Vec3::new(1.0, -2.0, 3.0)),
        Mat4::from_rotation_z(0.7) * Mat4::from_scale(Vec3::splat(0.5)),
    ];
    let view = Mat4::look_at_rh(Vec3::new(2.0, 2.0, 2.0), Vec3::ZERO, Vec3::Y);
    let projection = Mat4::perspective_rh(0.9, 1.5, 0.5, 50.0);
    set_scene(&mut table, Mat4::IDENTITY, view, projection);

    for world in worlds {
        table.set_matrix(MatrixSlot::World, world).unwrap();
        let expected = projection * view * world;
        assert!(table
            .get_matrix(MatrixSlot::WorldViewProjection)
            .abs_diff_eq(expected, 1e-5));
    }

    let moved = Mat4::look_at_rh(Vec3::new(-4.0, 1.0, 0.0), Vec3::ZERO, Vec3::Y);
    table.set_matrix(MatrixSlot::View, moved).unwrap();
    assert!(table
        .get_matrix(MatrixSlot::WorldViewProjection)
        .abs_diff_eq(projection * moved * worlds[2], 1e-5));
}

#[test]
fn derived_slots_cannot_be_written() {
    let mut table = MatrixTable::new();
    assert_eq!(
        table.set_matrix(MatrixSlot::ViewProjection, Mat4::IDENTITY),
        Err(RenderError::DerivedMatrixSlot(MatrixSlot::ViewProjection))
    );
}

#[test]
fn overwrite_stacking_restores_the_base() {
    let base = PipelineSettings::default().with_lighting(true).with_fog(true);
    let mut stack = OverwriteStack::new();

    stack
        .push(PipelineOverwrite::disable_lighting(), None)
        .unwrap();
    let applied = stack.apply(&base);
    assert!(!applied.lighting);
    assert!(applied.fog);

    stack.push(PipelineOverwrite::disable_fog(), None).unwrap();
    let applied = stack.apply(&base);
    assert!(!applied.lighting);
    assert!(!applied.fog);

    stack.pop(None).unwrap();
    stack.pop(None).unwrap();
    assert_eq!(stack.apply(&base), base);
    assert!(stack.fold().is_identity());
}

#[test]
fn scoped_pushes_leave_the_fold_unchanged() {
    let base = PipelineSettings::default();
    let mut stack = OverwriteStack::new();
    stack
        .push(PipelineOverwrite::add_polygon_offset(1.0), None)
        .unwrap();
    let before = *stack.fold();

    {
        let mut scope = stack.scope();
        scope.push(PipelineOverwrite::disable_lighting()).unwrap();
        scope.push(PipelineOverwrite::add_polygon_offset(2.0)).unwrap();
        assert_eq!(scope.apply(&base).polygon_offset, 3.0);
    }

    assert_eq!(*stack.fold(), before);
    assert_eq!(stack.len(), 1);
}

#[test]
fn conflicting_redefinition_keeps_the_schema() {
    let mut builder = ParamPackageBuilder::new("schema");
    builder.add_param("color", [0.0f32; 4]).unwrap();
    let size = builder.size();

    let err = builder.add_param("color", 0.0f32).unwrap_err();
    assert_eq!(
        err,
        RenderError::ParamTypeConflict {
            name: "color".into(),
            existing: ParamType::Vec4,
            requested: ParamType::Float,
        }
    );
    assert_eq!(builder.len(), 1);
    assert_eq!(builder.size(), size);
}
