/// Minimum allocation for growable buffers, in bytes.
const MIN_CAPACITY: u64 = 4096;

/// Owned GPU buffer that is destroyed exactly once when dropped.
///
/// Growth replaces the inner buffer; the old one is destroyed on replacement,
/// so every `create_buffer` is matched by one `destroy`.
pub(super) struct GpuBuffer {
    label: &'static str,
    usage: wgpu::BufferUsages,
    buffer: wgpu::Buffer,
    capacity: u64,
}

impl GpuBuffer {
    /// Allocates an empty buffer of at least `min_size` bytes. `COPY_DST` is always added.
    pub(super) fn new(
        device: &wgpu::Device,
        label: &'static str,
        usage: wgpu::BufferUsages,
        min_size: u64,
    ) -> Self {
        let usage = usage | wgpu::BufferUsages::COPY_DST;
        let capacity = grown_capacity(min_size);
        Self {
            label,
            usage,
            buffer: allocate(device, label, usage, capacity),
            capacity,
        }
    }

    /// Allocates a buffer holding `contents` (static data such as base meshes).
    pub(super) fn with_contents(
        device: &wgpu::Device,
        label: &'static str,
        usage: wgpu::BufferUsages,
        contents: &[u8],
    ) -> Self {
        use wgpu::util::DeviceExt;

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage,
        });
        Self {
            label,
            usage,
            buffer,
            capacity: contents.len() as u64,
        }
    }

    pub(super) fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub(super) fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Grows the buffer to hold `required` bytes. Returns `true` when the inner
    /// buffer was replaced, so bind groups referencing it must be rebuilt.
    pub(super) fn reserve(&mut self, device: &wgpu::Device, required: u64) -> bool {
        if required <= self.capacity {
            return false;
        }
        let capacity = grown_capacity(required);
        log::debug!("{}: growing {} -> {} bytes", self.label, self.capacity, capacity);

        let old = std::mem::replace(
            &mut self.buffer,
            allocate(device, self.label, self.usage, capacity),
        );
        old.destroy();
        self.capacity = capacity;
        true
    }

    /// Uploads `bytes` at offset 0, growing first if needed. Returns `true` on reallocation.
    pub(super) fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, bytes: &[u8]) -> bool {
        let grown = self.reserve(device, bytes.len() as u64);
        if !bytes.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
        grown
    }
}

impl Drop for GpuBuffer {
    fn drop(&mut self) {
        self.buffer.destroy();
    }
}

fn allocate(
    device: &wgpu::Device,
    label: &'static str,
    usage: wgpu::BufferUsages,
    size: u64,
) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage,
        mapped_at_creation: false,
    })
}

/// Capacity policy: next power of two, never below [`MIN_CAPACITY`].
fn grown_capacity(required: u64) -> u64 {
    required.next_power_of_two().max(MIN_CAPACITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_has_a_floor() {
        assert_eq!(grown_capacity(0), MIN_CAPACITY);
        assert_eq!(grown_capacity(1), MIN_CAPACITY);
        assert_eq!(grown_capacity(MIN_CAPACITY), MIN_CAPACITY);
    }

    #[test]
    fn capacity_rounds_to_power_of_two() {
        assert_eq!(grown_capacity(MIN_CAPACITY + 1), MIN_CAPACITY * 2);
        assert_eq!(grown_capacity(100_000), 131_072);
    }
}
