use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::render::geometry::{unit_sphere, MeshVertex};
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawItem, DrawList, Material, PerspectiveCamera, Scene};

/// Directional lights beyond this count are ignored.
pub const MAX_LIGHTS: usize = 4;

const KIND_PHONG: f32 = 0.0;
const KIND_BASIC: f32 = 1.0;

/// Cache key for generated sphere meshes: `(width_segments, height_segments)`.
type GeometryKey = (u32, u32);

/// Renderer for every mesh node in a [`Scene`].
///
/// Supported materials:
/// - `Material::Phong` (ambient + Blinn-Phong directional lighting + emissive)
/// - `Material::Basic` (unlit)
///
/// Meshes sharing a geometry key are drawn with one instanced call.
#[derive(Default)]
pub struct MeshRenderer {
    pipeline_key: Option<(wgpu::TextureFormat, wgpu::TextureFormat, u32)>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    globals_ubo: Option<wgpu::Buffer>,

    geometries: HashMap<GeometryKey, GpuGeometry>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,

    draw_list: DrawList,
    instances: Vec<MeshInstance>,
    batches: Vec<Batch>,
}

struct GpuGeometry {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
}

/// Contiguous run of instances sharing one geometry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Batch {
    key: GeometryKey,
    start: u32,
    end: u32,
}

impl MeshRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every GPU resource. The next `render` recreates what it needs.
    pub fn release(&mut self) {
        self.pipeline_key = None;
        self.pipeline = None;
        self.bind_group_layout = None;
        self.bind_group = None;
        self.globals_ubo = None;
        self.geometries.clear();
        self.instance_vbo = None;
        self.instance_capacity = 0;
    }

    /// True when no GPU resources are held.
    pub fn is_released(&self) -> bool {
        self.pipeline.is_none() && self.geometries.is_empty() && self.instance_vbo.is_none()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) {
        self.draw_list.rebuild(scene);
        if self.draw_list.is_empty() {
            return;
        }

        build_batches(self.draw_list.items(), &mut self.instances, &mut self.batches);

        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        for batch in &self.batches {
            self.geometries
                .entry(batch.key)
                .or_insert_with(|| upload_geometry(ctx.device, batch.key));
        }
        self.ensure_instance_capacity(ctx, self.instances.len());

        let Some(globals_ubo) = self.globals_ubo.as_ref() else { return };
        ctx.queue
            .write_buffer(globals_ubo, 0, bytemuck::bytes_of(&globals_uniform(scene, camera)));

        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        ctx.queue
            .write_buffer(instance_vbo, 0, bytemuck::cast_slice(&self.instances));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };

        let color = target.color_attachment(wgpu::LoadOp::Load);
        let depth = target.depth_attachment(wgpu::LoadOp::Load);
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("selene mesh pass"),
            color_attachments: &[Some(color)],
            depth_stencil_attachment: Some(depth),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));

        for batch in &self.batches {
            let Some(geometry) = self.geometries.get(&batch.key) else { continue };
            rpass.set_vertex_buffer(0, geometry.vbo.slice(..));
            rpass.set_index_buffer(geometry.ibo.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..geometry.index_count, 0, batch.start..batch.end);
        }
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        let key = (ctx.surface_format, ctx.depth_format, ctx.sample_count);
        if self.pipeline_key == Some(key) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("selene mesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("selene mesh bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<GlobalsUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("selene mesh pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("selene mesh pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[MeshVertex::layout(), MeshInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: ctx.depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: ctx.sample_count,
                ..Default::default()
            },
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_key = Some(key);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
        self.globals_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.globals_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let globals_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("selene mesh globals ubo"),
            size: std::mem::size_of::<GlobalsUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("selene mesh bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_ubo.as_entire_binding(),
            }],
        });

        self.globals_ubo = Some(globals_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }
        let new_cap = required.next_power_of_two().max(64);
        let new_size = (new_cap * std::mem::size_of::<MeshInstance>()) as u64;
        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("selene mesh instance vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

fn upload_geometry(device: &wgpu::Device, key: GeometryKey) -> GpuGeometry {
    let mesh = unit_sphere(key.0, key.1);
    log::debug!(
        "uploading sphere {}x{} ({} vertices, {} indices)",
        key.0,
        key.1,
        mesh.vertices.len(),
        mesh.indices.len()
    );

    GpuGeometry {
        vbo: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("selene sphere vbo"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }),
        ibo: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("selene sphere ibo"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        }),
        index_count: mesh.indices.len() as u32,
    }
}

/// Converts draw items into instance data, ordered so that items sharing a
/// geometry are contiguous. Traversal order is kept within each batch.
fn build_batches(items: &[DrawItem], instances: &mut Vec<MeshInstance>, batches: &mut Vec<Batch>) {
    let mut keyed: Vec<(GeometryKey, MeshInstance)> = items
        .iter()
        .map(|item| {
            let key = (item.geometry.width_segments, item.geometry.height_segments);
            (key, MeshInstance::new(item))
        })
        .collect();
    keyed.sort_by_key(|(key, _)| *key);

    instances.clear();
    batches.clear();
    for (i, (key, inst)) in keyed.into_iter().enumerate() {
        instances.push(inst);
        let i = i as u32;
        match batches.last_mut() {
            Some(b) if b.key == key => b.end = i + 1,
            _ => batches.push(Batch { key, start: i, end: i + 1 }),
        }
    }
}

fn globals_uniform(scene: &Scene, camera: &PerspectiveCamera) -> GlobalsUniform {
    let ambient = scene
        .ambient
        .map_or([0.0; 4], |a| a.color.scaled(a.intensity).to_array());

    let mut lights = [LightUniform::zeroed(); MAX_LIGHTS];
    let count = scene.directional.len().min(MAX_LIGHTS);
    if scene.directional.len() > MAX_LIGHTS {
        log::debug!("{} directional lights, using the first {MAX_LIGHTS}", scene.directional.len());
    }
    for (slot, light) in lights.iter_mut().zip(&scene.directional) {
        *slot = LightUniform {
            direction: light.direction_to_light().extend(0.0).to_array(),
            color: light.color.scaled(light.intensity).to_array(),
        };
    }

    GlobalsUniform {
        view_proj: camera.view_projection().to_cols_array_2d(),
        camera_pos: camera.position.extend(1.0).to_array(),
        ambient,
        counts: [count as u32, 0, 0, 0],
        lights,
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct LightUniform {
    direction: [f32; 4],
    color: [f32; 4],
}

/// Per-frame uniform (240 bytes), mirrored by `Globals` in `mesh.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlobalsUniform {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    ambient: [f32; 4],
    counts: [u32; 4],
    lights: [LightUniform; MAX_LIGHTS],
}

/// Instance data layout (128 bytes):
///
///  offset   0  model     [[f32; 4]; 4]  loc 2..5
///  offset  64  color     [f32; 4]       loc 6
///  offset  80  emissive  [f32; 4]       loc 7
///  offset  96  specular  [f32; 4]       loc 8  (.w = shininess)
///  offset 112  params    [f32; 4]       loc 9  (.x = material kind)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct MeshInstance {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    emissive: [f32; 4],
    specular: [f32; 4],
    params: [f32; 4],
}

impl MeshInstance {
    const ATTRS: [wgpu::VertexAttribute; 8] = wgpu::vertex_attr_array![
        2 => Float32x4, // model col 0
        3 => Float32x4, // model col 1
        4 => Float32x4, // model col 2
        5 => Float32x4, // model col 3
        6 => Float32x4, // color
        7 => Float32x4, // emissive
        8 => Float32x4, // specular
        9 => Float32x4  // params
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }

    fn new(item: &DrawItem) -> Self {
        let model = item.world * Mat4::from_scale(Vec3::splat(item.geometry.radius));
        let (color, emissive, specular, kind) = match item.material {
            Material::Phong(m) => {
                let mut specular = m.specular.to_array();
                specular[3] = m.shininess;
                (m.color.to_array(), m.emissive.to_array(), specular, KIND_PHONG)
            }
            Material::Basic(m) => (m.color.to_array(), [0.0; 4], [0.0; 4], KIND_BASIC),
        };
        Self {
            model: model.to_cols_array_2d(),
            color,
            emissive,
            specular,
            params: [kind, 0.0, 0.0, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;
    use crate::scene::{
        AmbientLight, BasicMaterial, DirectionalLight, Mesh, Node, PhongMaterial, SphereGeometry,
        Transform,
    };

    fn mesh(radius: f32, segments: u32, material: Material) -> Node {
        Node::mesh(
            "m",
            Mesh {
                geometry: SphereGeometry::new(radius, segments, segments),
                material,
            },
        )
    }

    fn basic() -> Material {
        BasicMaterial { color: Color::WHITE }.into()
    }

    #[test]
    fn gpu_struct_sizes_match_shader_layout() {
        assert_eq!(std::mem::size_of::<GlobalsUniform>(), 240);
        assert_eq!(std::mem::size_of::<MeshInstance>(), 128);
    }

    #[test]
    fn batches_group_by_geometry() {
        let mut scene = Scene::default();
        let root = scene.add(mesh(1.0, 32, PhongMaterial::default().into()));
        for _ in 0..3 {
            scene.add_child(root, mesh(0.1, 16, basic()));
        }
        let mut list = DrawList::new();
        list.rebuild(&scene);

        let (mut instances, mut batches) = (Vec::new(), Vec::new());
        build_batches(list.items(), &mut instances, &mut batches);

        assert_eq!(instances.len(), 4);
        assert_eq!(
            batches,
            vec![
                Batch { key: (16, 16), start: 0, end: 3 },
                Batch { key: (32, 32), start: 3, end: 4 },
            ]
        );
    }

    #[test]
    fn instance_model_includes_radius_and_parent_transform() {
        let mut scene = Scene::default();
        let root = scene.add(Node::group("g").with_transform(Transform::from_position(Vec3::Z)));
        scene.add_child(root, mesh(0.25, 8, basic()));
        let mut list = DrawList::new();
        list.rebuild(&scene);

        let inst = MeshInstance::new(&list.items()[0]);
        let model = Mat4::from_cols_array_2d(&inst.model);
        let p = model.transform_point3(Vec3::X);
        assert!((p - Vec3::new(0.25, 0.0, 1.0)).length() < 1e-6);
        assert_eq!(inst.params[0], KIND_BASIC);
    }

    #[test]
    fn phong_instance_packs_shininess() {
        let mut scene = Scene::default();
        let m = PhongMaterial { shininess: 30.0, ..PhongMaterial::default() };
        scene.add(mesh(1.0, 8, m.into()));
        let mut list = DrawList::new();
        list.rebuild(&scene);

        let inst = MeshInstance::new(&list.items()[0]);
        assert_eq!(inst.specular[3], 30.0);
        assert_eq!(inst.params[0], KIND_PHONG);
    }

    #[test]
    fn globals_carry_scaled_lights() {
        let mut scene = Scene::default();
        scene.ambient = Some(AmbientLight { color: Color::WHITE, intensity: 0.5 });
        scene.directional.push(DirectionalLight {
            color: Color::WHITE,
            intensity: 2.0,
            position: Vec3::Y,
            target: Vec3::ZERO,
        });
        let camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0);

        let g = globals_uniform(&scene, &camera);
        assert_eq!(g.ambient, [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(g.counts[0], 1);
        assert_eq!(g.lights[0].direction, [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(g.lights[0].color, [2.0, 2.0, 2.0, 1.0]);
    }

    #[test]
    fn extra_lights_are_dropped() {
        let mut scene = Scene::default();
        for _ in 0..MAX_LIGHTS + 2 {
            scene.directional.push(DirectionalLight {
                color: Color::WHITE,
                intensity: 1.0,
                position: Vec3::X,
                target: Vec3::ZERO,
            });
        }
        let camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0);
        assert_eq!(globals_uniform(&scene, &camera).counts[0], MAX_LIGHTS as u32);
    }

    #[test]
    fn fresh_renderer_holds_no_gpu_resources() {
        let mut r = MeshRenderer::new();
        assert!(r.is_released());
        r.release();
        assert!(r.is_released());
    }
}
