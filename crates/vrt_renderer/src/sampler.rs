//! Sample pattern generators for anti-aliasing and ambient occlusion.
//!
//! A `SampleBuffer` holds `num_sets` independent sets of `num_samples`
//! offsets plus one shuffled index table per set. A `Sampler` draws from a
//! buffer through its own `DrawCursor`: consecutive draws walk one set in
//! shuffled order, and every `num_samples` draws the cursor jumps to a
//! randomly chosen set so neighbouring pixels do not share a pattern.
//!
//! Drawing needs `&mut Sampler`, so one instance serves exactly one consumer.
//! Concurrent consumers each take a `fork`, which shares the buffer and owns
//! a fresh cursor and RNG.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use vrt_math::{Vec2, Vec3};

/// Largest f32 below 1.0.
const ONE_MINUS_EPSILON: f32 = 1.0 - f32::EPSILON / 2.0;

/// The sample pattern families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SamplingStrategy {
    /// Cell centres of a square grid
    Regular,
    /// Uniform random points
    Random,
    /// One random point per grid cell
    Jittered,
    /// Latin hypercube: one sample per row and per column
    NRooks,
    /// Jittered grid with N-Rooks shuffling of both coordinates
    #[default]
    MultiJittered,
    /// Low-discrepancy sequence from the base-2 radical inverse
    Hammersley,
}

impl SamplingStrategy {
    /// Whether the strategy lays its samples out on a square grid.
    pub fn needs_square(self) -> bool {
        matches!(
            self,
            SamplingStrategy::Regular | SamplingStrategy::Jittered | SamplingStrategy::MultiJittered
        )
    }
}

/// Base-2 radical inverse (bit reversal of `j` behind the binary point).
pub fn radical_inverse(j: u32) -> f32 {
    (j.reverse_bits() as f64 / 4_294_967_296.0) as f32
}

/// Generated samples for every set plus the decorrelating permutations.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    strategy: SamplingStrategy,
    num_samples: usize,
    num_sets: usize,
    step: Vec2,
    /// Offsets in [0, step.x) x [0, step.y), set after set
    samples: Vec<Vec2>,
    /// The same samples mapped onto the unit hemisphere around +Z
    hemisphere: Vec<Vec3>,
    /// One permutation of [0, num_samples) per set
    shuffled_indices: Vec<usize>,
}

impl SampleBuffer {
    /// Generate `num_sets` sets of `num_samples` samples scaled to `step`.
    ///
    /// Grid based strategies round `num_samples` up to the next perfect
    /// square. Zero counts are treated as one.
    pub fn generate(
        strategy: SamplingStrategy,
        num_samples: usize,
        num_sets: usize,
        step: Vec2,
        rng: &mut dyn RngCore,
    ) -> Self {
        let requested = num_samples.max(1);
        let num_sets = num_sets.max(1);

        let num_samples = if strategy.needs_square() {
            let k = ceil_sqrt(requested);
            if k * k != requested {
                log::warn!(
                    "{:?} sampling needs a square sample count, using {} instead of {}",
                    strategy,
                    k * k,
                    requested
                );
            }
            k * k
        } else {
            requested
        };

        let unit = match strategy {
            SamplingStrategy::Regular => regular(num_samples, num_sets),
            SamplingStrategy::Random => random(num_samples, num_sets, rng),
            SamplingStrategy::Jittered => jittered(num_samples, num_sets, rng),
            SamplingStrategy::NRooks => n_rooks(num_samples, num_sets, rng),
            SamplingStrategy::MultiJittered => multi_jittered(num_samples, num_sets, rng),
            SamplingStrategy::Hammersley => hammersley(num_samples, num_sets),
        };

        let mut buffer = Self {
            strategy,
            num_samples,
            num_sets,
            step,
            hemisphere: cosine_power_hemisphere(&unit, 1.0),
            samples: unit.iter().map(|p| scale_to_step(*p, step)).collect(),
            shuffled_indices: Vec::new(),
        };
        buffer.setup_shuffled_indices(rng);

        log::debug!(
            "Generated {} sets of {} {:?} samples",
            buffer.num_sets,
            buffer.num_samples,
            buffer.strategy
        );

        buffer
    }

    /// Remap the hemisphere samples to a cosine-power distribution.
    ///
    /// `e = 1` is cosine weighted, larger exponents bunch samples towards the
    /// pole.
    pub fn map_to_hemisphere(mut self, e: f32) -> Self {
        let unit: Vec<Vec2> = self
            .samples
            .iter()
            .map(|p| Vec2::new(unscale(p.x, self.step.x), unscale(p.y, self.step.y)))
            .collect();
        self.hemisphere = cosine_power_hemisphere(&unit, e);
        self
    }

    /// The same pattern and permutations over a new step.
    pub fn rescaled(&self, step: Vec2) -> Self {
        let samples = self
            .samples
            .iter()
            .map(|p| {
                let unit = Vec2::new(unscale(p.x, self.step.x), unscale(p.y, self.step.y));
                scale_to_step(unit, step)
            })
            .collect();

        Self {
            strategy: self.strategy,
            num_samples: self.num_samples,
            num_sets: self.num_sets,
            step,
            samples,
            hemisphere: self.hemisphere.clone(),
            shuffled_indices: self.shuffled_indices.clone(),
        }
    }

    /// Build one Fisher-Yates shuffled permutation of [0, num_samples) per set.
    fn setup_shuffled_indices(&mut self, rng: &mut dyn RngCore) {
        self.shuffled_indices = Vec::with_capacity(self.num_samples * self.num_sets);
        let mut indices: Vec<usize> = (0..self.num_samples).collect();

        for _ in 0..self.num_sets {
            shuffle(&mut indices, rng);
            self.shuffled_indices.extend_from_slice(&indices);
        }
    }

    pub fn strategy(&self) -> SamplingStrategy {
        self.strategy
    }

    /// Samples per set (after rounding).
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn num_sets(&self) -> usize {
        self.num_sets
    }

    pub fn step(&self) -> Vec2 {
        self.step
    }

    /// The samples of set `p`.
    pub fn set(&self, p: usize) -> &[Vec2] {
        &self.samples[p * self.num_samples..(p + 1) * self.num_samples]
    }

    /// The permutation of set `p`.
    pub fn shuffled_set(&self, p: usize) -> &[usize] {
        &self.shuffled_indices[p * self.num_samples..(p + 1) * self.num_samples]
    }

    /// All samples, set after set.
    pub fn samples(&self) -> &[Vec2] {
        &self.samples
    }

    pub fn hemisphere_samples(&self) -> &[Vec3] {
        &self.hemisphere
    }
}

/// Draw position inside a `SampleBuffer`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawCursor {
    /// Draws made so far
    count: usize,
    /// Start of the active set
    jump: usize,
}

impl DrawCursor {
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn jump(&self) -> usize {
        self.jump
    }

    /// Advance one draw and return the buffer index to read.
    fn advance(&mut self, buffer: &SampleBuffer, rng: &mut dyn RngCore) -> usize {
        let n = buffer.num_samples;
        if self.count % n == 0 {
            self.jump = (rng.next_u32() as usize % buffer.num_sets) * n;
        }

        let index = self.jump + buffer.shuffled_indices[self.jump + self.count % n];
        debug_assert!(index < buffer.num_sets * n);

        self.count = self.count.wrapping_add(1);
        index
    }
}

/// A sample buffer with its own draw cursor.
#[derive(Debug, Clone)]
pub struct Sampler {
    buffer: Arc<SampleBuffer>,
    cursor: DrawCursor,
    rng: StdRng,
}

impl Sampler {
    /// Generate a new buffer and a sampler over it.
    pub fn new(
        strategy: SamplingStrategy,
        num_samples: usize,
        num_sets: usize,
        step: Vec2,
        seed: u64,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let buffer = SampleBuffer::generate(strategy, num_samples, num_sets, step, &mut rng);
        Self {
            buffer: Arc::new(buffer),
            cursor: DrawCursor::default(),
            rng,
        }
    }

    /// Sampler over the unit square.
    pub fn unit(strategy: SamplingStrategy, num_samples: usize, num_sets: usize, seed: u64) -> Self {
        Self::new(strategy, num_samples, num_sets, Vec2::ONE, seed)
    }

    /// Sampler over an existing buffer.
    pub fn from_buffer(buffer: Arc<SampleBuffer>, seed: u64) -> Self {
        Self {
            buffer,
            cursor: DrawCursor::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A sampler for another consumer: same buffer, fresh cursor and RNG.
    pub fn fork(&self, seed: u64) -> Self {
        Self::from_buffer(Arc::clone(&self.buffer), seed)
    }

    pub fn buffer(&self) -> &Arc<SampleBuffer> {
        &self.buffer
    }

    pub fn cursor(&self) -> DrawCursor {
        self.cursor
    }

    /// Samples per set.
    pub fn num_samples(&self) -> usize {
        self.buffer.num_samples
    }

    /// Next offset in [0, step.x) x [0, step.y).
    pub fn sample_unit_square(&mut self) -> Vec2 {
        let index = self.cursor.advance(&self.buffer, &mut self.rng);
        self.buffer.samples[index]
    }

    /// Next direction on the unit hemisphere around +Z.
    pub fn sample_hemisphere(&mut self) -> Vec3 {
        let index = self.cursor.advance(&self.buffer, &mut self.rng);
        self.buffer.hemisphere[index]
    }
}

// =============================================================================
// Generators (unit square)
// =============================================================================

fn ceil_sqrt(n: usize) -> usize {
    let mut k = (n as f64).sqrt() as usize;
    while k * k < n {
        k += 1;
    }
    k
}

#[inline]
fn unit_coord(v: f32) -> f32 {
    v.min(ONE_MINUS_EPSILON)
}

fn regular(n: usize, sets: usize) -> Vec<Vec2> {
    let k = ceil_sqrt(n);
    let mut samples = Vec::with_capacity(n * sets);
    for _ in 0..sets {
        for j in 0..k {
            for i in 0..k {
                samples.push(Vec2::new(
                    (i as f32 + 0.5) / k as f32,
                    (j as f32 + 0.5) / k as f32,
                ));
            }
        }
    }
    samples
}

fn random(n: usize, sets: usize, rng: &mut dyn RngCore) -> Vec<Vec2> {
    (0..n * sets)
        .map(|_| Vec2::new(rng.gen::<f32>(), rng.gen::<f32>()))
        .collect()
}

fn jittered(n: usize, sets: usize, rng: &mut dyn RngCore) -> Vec<Vec2> {
    let k = ceil_sqrt(n);
    let mut samples = Vec::with_capacity(n * sets);
    for _ in 0..sets {
        for j in 0..k {
            for i in 0..k {
                samples.push(Vec2::new(
                    unit_coord((i as f32 + rng.gen::<f32>()) / k as f32),
                    unit_coord((j as f32 + rng.gen::<f32>()) / k as f32),
                ));
            }
        }
    }
    samples
}

fn n_rooks(n: usize, sets: usize, rng: &mut dyn RngCore) -> Vec<Vec2> {
    let mut samples = Vec::with_capacity(n * sets);
    for _ in 0..sets {
        // On the diagonal: sample j in row j and column j
        for j in 0..n {
            samples.push(Vec2::new(
                unit_coord((j as f32 + rng.gen::<f32>()) / n as f32),
                unit_coord((j as f32 + rng.gen::<f32>()) / n as f32),
            ));
        }
    }

    // Shuffle x and y independently within each set
    for set in samples.chunks_mut(n) {
        for i in (1..n).rev() {
            let k = rng.gen_range(0..=i);
            let t = set[i].x;
            set[i].x = set[k].x;
            set[k].x = t;
        }
        for i in (1..n).rev() {
            let k = rng.gen_range(0..=i);
            let t = set[i].y;
            set[i].y = set[k].y;
            set[k].y = t;
        }
    }
    samples
}

fn multi_jittered(n: usize, sets: usize, rng: &mut dyn RngCore) -> Vec<Vec2> {
    let k = ceil_sqrt(n);
    let subcell = 1.0 / n as f32;
    let mut samples = vec![Vec2::ZERO; n * sets];

    for set in samples.chunks_mut(n) {
        // Coarse cell (i, j) starts in fine column i*k + j and fine row j*k + i
        for i in 0..k {
            for j in 0..k {
                set[i * k + j] = Vec2::new(
                    unit_coord(((i * k + j) as f32 + rng.gen::<f32>()) * subcell),
                    unit_coord(((j * k + i) as f32 + rng.gen::<f32>()) * subcell),
                );
            }
        }

        // Shuffle x within coarse columns
        for i in 0..k {
            for j in 0..k {
                let m = rng.gen_range(j..k);
                let t = set[i * k + j].x;
                set[i * k + j].x = set[i * k + m].x;
                set[i * k + m].x = t;
            }
        }

        // Shuffle y within coarse rows
        for i in 0..k {
            for j in 0..k {
                let m = rng.gen_range(j..k);
                let t = set[j * k + i].y;
                set[j * k + i].y = set[m * k + i].y;
                set[m * k + i].y = t;
            }
        }
    }
    samples
}

fn hammersley(n: usize, sets: usize) -> Vec<Vec2> {
    let mut samples = Vec::with_capacity(n * sets);
    for _ in 0..sets {
        for j in 0..n {
            samples.push(Vec2::new(j as f32 / n as f32, radical_inverse(j as u32)));
        }
    }
    samples
}

/// Fisher-Yates shuffle.
fn shuffle(list: &mut [usize], rng: &mut dyn RngCore) {
    for i in (1..list.len()).rev() {
        let k = rng.gen_range(0..=i);
        list.swap(i, k);
    }
}

/// Map unit-square samples onto the hemisphere with density cos^e.
fn cosine_power_hemisphere(unit: &[Vec2], e: f32) -> Vec<Vec3> {
    unit.iter()
        .map(|p| {
            let phi = 2.0 * std::f32::consts::PI * p.x;
            let cos_theta = (1.0 - p.y).powf(1.0 / (e + 1.0));
            let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
            Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
        })
        .collect()
}

fn scale_to_step(p: Vec2, step: Vec2) -> Vec2 {
    Vec2::new(scale(p.x, step.x), scale(p.y, step.y))
}

/// Scale a [0, 1) coordinate to [0, step), never rounding up onto `step`.
fn scale(v: f32, step: f32) -> f32 {
    let scaled = v * step;
    if step > 0.0 && scaled >= step {
        f32::from_bits(step.to_bits() - 1)
    } else {
        scaled
    }
}

fn unscale(v: f32, step: f32) -> f32 {
    if step > 0.0 {
        unit_coord(v / step)
    } else {
        0.0
    }
}
