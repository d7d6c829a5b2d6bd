use anyhow::{Context, Result};

/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Offscreen color target size in device pixels.
    pub width: u32,
    pub height: u32,

    /// Color target format. sRGB keeps GUI colors correct.
    pub color_format: wgpu::TextureFormat,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly necessary.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Allow a software adapter when no hardware adapter is present (CI).
    pub allow_fallback_adapter: bool,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            width: 854,
            height: 480,
            color_format: wgpu::TextureFormat::Rgba8UnormSrgb,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            allow_fallback_adapter: true,
        }
    }
}

/// Headless wgpu context: device, queue and an offscreen color + depth target.
pub struct Gpu {
    device: wgpu::Device,
    queue: wgpu::Queue,
    adapter_info: wgpu::AdapterInfo,

    color_format: wgpu::TextureFormat,
    color: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    size: (u32, u32),
}

/// One frame worth of recorded commands.
///
/// Finalize promptly with [`Gpu::submit`].
pub struct GpuFrame {
    pub encoder: wgpu::CommandEncoder,
}

/// Depth format shared by the world pipelines and the offscreen target.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

impl Gpu {
    /// Creates a device without any surface.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(init: GpuInit) -> Result<Self> {
        anyhow::ensure!(init.width > 0 && init.height > 0, "offscreen target has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(err) if init.allow_fallback_adapter => {
                log::warn!("no hardware adapter ({err}); trying fallback adapter");
                instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::LowPower,
                        compatible_surface: None,
                        force_fallback_adapter: true,
                    })
                    .await
                    .context("failed to find a fallback GPU adapter")?
            }
            Err(err) => return Err(err).context("failed to find a suitable GPU adapter"),
        };
        let adapter_info = adapter.get_info();
        log::info!("using adapter {} ({:?})", adapter_info.name, adapter_info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("drawbridge device"),
                required_features: init.required_features,
                required_limits: init.required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let (color, color_view, depth_view) =
            create_targets(&device, init.color_format, init.width, init.height);

        Ok(Gpu {
            device,
            queue,
            adapter_info,
            color_format: init.color_format,
            color,
            color_view,
            depth_view,
            size: (init.width, init.height),
        })
    }

    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.color_format
    }

    /// Offscreen target size in device pixels.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn color_texture(&self) -> &wgpu::Texture {
        &self.color
    }

    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// Recreates the offscreen targets. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == self.size {
            return;
        }
        let (color, color_view, depth_view) = create_targets(&self.device, self.color_format, width, height);
        self.color = color;
        self.color_view = color_view;
        self.depth_view = depth_view;
        self.size = (width, height);
    }

    pub fn begin_frame(&self) -> GpuFrame {
        let encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("drawbridge frame encoder"),
        });
        GpuFrame { encoder }
    }

    /// Clears color and depth at the start of a frame.
    pub fn clear(&self, frame: &mut GpuFrame, color: wgpu::Color) {
        let _pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("drawbridge clear pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    pub fn submit(&self, frame: GpuFrame) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
    }
}

fn create_targets(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView, wgpu::TextureView) {
    let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };

    let color = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("drawbridge offscreen color"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let depth = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("drawbridge offscreen depth"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });

    let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());
    let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());
    (color, color_view, depth_view)
}
