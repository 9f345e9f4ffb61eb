use std::path::Path;

use crate::world::World;

/// Paint target for the draw step. The simulation only ever clears the
/// surface and fills rectangles; everything else is the caller's concern.
pub trait Surface {
    fn clear(&mut self);
    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: (u8, u8, u8));
}

/// In-memory RGB framebuffer backing file-based frame dumps.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        PixelSurface {
            width,
            height,
            pixels: vec![0; (width * height * 3) as usize],
        }
    }

    /// A surface sized to the world at the given cell scale.
    pub fn for_world(world: &World, cell_size: u32) -> Self {
        Self::new(
            world.width() as u32 * cell_size,
            world.height() as u32 * cell_size,
        )
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8) {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} surface",
            self.width,
            self.height
        );
        let idx = ((y * self.width + x) * 3) as usize;
        (self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2])
    }

    /// Write the frame as a binary PPM image.
    pub fn write_ppm(&self, path: &Path) -> Result<(), String> {
        let mut data = format!("P6\n{} {}\n255\n", self.width, self.height).into_bytes();
        data.extend_from_slice(&self.pixels);
        std::fs::write(path, data).map_err(|e| format!("Cannot write {}: {}", path.display(), e))
    }
}

impl Surface for PixelSurface {
    fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: (u8, u8, u8)) {
        let x1 = (x + width).min(self.width);
        let y1 = (y + height).min(self.height);
        for py in y.min(self.height)..y1 {
            for px in x.min(self.width)..x1 {
                let idx = ((py * self.width + px) * 3) as usize;
                self.pixels[idx] = color.0;
                self.pixels[idx + 1] = color.1;
                self.pixels[idx + 2] = color.2;
            }
        }
    }
}

/// Paint every occupied slot, layers bottom to top, each cell as a
/// `cell_size` square. Pure output; the world is not touched.
pub fn draw(world: &World, surface: &mut dyn Surface, cell_size: u32) {
    surface.clear();
    for layer in &world.layers {
        for y in 0..layer.height() {
            for x in 0..layer.width() {
                if let Some(cell) = layer.cell_at(x, y) {
                    surface.fill_rect(
                        x as u32 * cell_size,
                        y as u32 * cell_size,
                        cell_size,
                        cell_size,
                        cell.color().rgb8(),
                    );
                }
            }
        }
    }
}
