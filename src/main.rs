use glam::{Mat4, Vec3};
use render_statecache::params::{standard_material, Color, TextureSlot};
use render_statecache::pipeline::{DrawMode, PipelineOverwrite};
use render_statecache::renderer::{
    DrawRequest, Fog, GeometryBuffers, Light, Pass, RecordingBackend, RenderMode, RenderTransform,
    Renderer, Winding,
};
use render_statecache::shader::registry::{LIT_UNIFORM, SOLID};
use render_statecache::{init_logging, RendererSettings, ShaderRegistry};

fn run() -> render_statecache::Result<()> {
    let settings = RendererSettings::load();
    let aspect = settings.resolution.width as f32 / settings.resolution.height as f32;
    let mut renderer = Renderer::new(
        RecordingBackend::new(),
        settings,
        ShaderRegistry::with_builtin(),
    );

    let solid = renderer.shaders_mut().instantiate(SOLID)?;
    let lit = renderer.shaders_mut().instantiate(LIT_UNIFORM)?;

    renderer.set_transform(
        RenderTransform::View,
        Mat4::look_at_rh(Vec3::new(0.0, 2.0, 6.0), Vec3::ZERO, Vec3::Y),
    );
    renderer.set_transform(
        RenderTransform::Projection,
        Mat4::perspective_rh(60f32.to_radians(), aspect, 0.1, 100.0),
    );
    renderer.add_light(Light::directional(
        Vec3::new(-1.0, -1.0, -0.5),
        Vec3::ONE,
        1.0,
    ));
    renderer.set_fog(Fog::linear(Color::new(0.6, 0.7, 0.8, 1.0), 5.0, 50.0));

    let material = standard_material()?;
    let mut params = material.create_package();
    params
        .param_by_name_mut::<Color>("DiffuseColor")?
        .set(Color::new(0.8, 0.2, 0.2, 1.0));
    params
        .param_by_name_mut::<TextureSlot>("Texture0")?
        .set(TextureSlot(1));

    let mut pass = Pass::new(solid).with_params(params);
    pass.settings.fog = true;
    pass.bind_textures_from_params()?;
    renderer.set_pass(pass.clone());

    let cube = GeometryBuffers::new(1).with_indices(2, Default::default());
    for x in -2..=2 {
        renderer.set_transform(
            RenderTransform::World,
            Mat4::from_translation(Vec3::new(x as f32 * 1.5, 0.0, 0.0)),
        );
        renderer.draw(&DrawRequest::triangles(12, cube));
    }

    {
        let mut outline = renderer.overwrite_scope();
        outline.push(PipelineOverwrite::force_draw_mode(DrawMode::Wireframe))?;
        outline.push(PipelineOverwrite::disable_lighting())?;
        outline.push(PipelineOverwrite::add_polygon_offset(1.0))?;
        outline.draw(&DrawRequest::triangles(12, cube).with_winding(Winding::Clockwise));
    }

    renderer.set_pass(Pass {
        shader: lit,
        ..pass
    });
    renderer.draw(&DrawRequest::triangles(12, cube));

    renderer.set_render_mode(RenderMode::Mode2D);
    renderer.set_transform(RenderTransform::World, Mat4::IDENTITY);
    renderer.draw(&DrawRequest::triangles(2, GeometryBuffers::new(3)));

    let stats = renderer.take_stats();
    log::info!(
        "Frame: {} draws, {} primitives, {} state changes ({} transforms, {} passes)",
        stats.draw_calls,
        stats.primitives,
        stats.total_state_changes(),
        stats.transform_uploads,
        stats.pass_changes
    );
    log::info!(
        "Backend received {} calls",
        renderer.backend().calls().len()
    );
    Ok(())
}

fn main() {
    init_logging();
    if let Err(err) = run() {
        log::error!("Demo failed: {err}");
        std::process::exit(1);
    }
}
