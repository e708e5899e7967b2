//! Premultiplied RGBA8 pixel kernels used by the CPU pass.

use crate::filters::sigma::StyleFactors;
use crate::foundation::core::{Affine, ISize, Point, Vec2};
use crate::foundation::error::{FilterError, FilterResult};
use crate::foundation::math::gaussian_integral;
use crate::scene::blend::BlendMode;

/// Normalized premultiplied pixel.
pub(crate) type Px = [f32; 4];

/// Blends `src` onto `dst`.
pub(crate) type BlendKernel = fn(Px, Px) -> Px;

pub(crate) fn to_px(p: [u8; 4]) -> Px {
    [
        f32::from(p[0]) / 255.0,
        f32::from(p[1]) / 255.0,
        f32::from(p[2]) / 255.0,
        f32::from(p[3]) / 255.0,
    ]
}

pub(crate) fn from_px(p: Px) -> [u8; 4] {
    let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [q(p[0]), q(p[1]), q(p[2]), q(p[3])]
}

/// Pick the kernel for `mode`.
///
/// Dispatch happens once per draw, never per pixel.
pub(crate) fn blend_kernel(mode: BlendMode) -> BlendKernel {
    match mode {
        BlendMode::Clear => clear,
        BlendMode::Source => source,
        BlendMode::Destination => destination,
        BlendMode::SourceOver => source_over,
        BlendMode::DestinationOver => destination_over,
        BlendMode::SourceIn => source_in,
        BlendMode::DestinationIn => destination_in,
        BlendMode::SourceOut => source_out,
        BlendMode::DestinationOut => destination_out,
        BlendMode::SourceATop => source_atop,
        BlendMode::DestinationATop => destination_atop,
        BlendMode::Xor => xor,
        BlendMode::Plus => plus,
        BlendMode::Modulate => modulate,
        BlendMode::Screen => screen,
        BlendMode::Overlay => overlay,
        BlendMode::Darken => darken,
        BlendMode::Lighten => lighten,
        BlendMode::ColorDodge => color_dodge,
        BlendMode::ColorBurn => color_burn,
        BlendMode::HardLight => hard_light,
        BlendMode::SoftLight => soft_light,
        BlendMode::Difference => difference,
        BlendMode::Exclusion => exclusion,
        BlendMode::Multiply => multiply,
        BlendMode::Hue => hue,
        BlendMode::Saturation => saturation,
        BlendMode::Color => color,
        BlendMode::Luminosity => luminosity,
    }
}

fn porter_duff(s: Px, d: Px, fs: f32, fd: f32) -> Px {
    [
        s[0] * fs + d[0] * fd,
        s[1] * fs + d[1] * fd,
        s[2] * fs + d[2] * fd,
        s[3] * fs + d[3] * fd,
    ]
}

fn clear(_: Px, _: Px) -> Px {
    [0.0; 4]
}

fn source(s: Px, _: Px) -> Px {
    s
}

fn destination(_: Px, d: Px) -> Px {
    d
}

fn source_over(s: Px, d: Px) -> Px {
    porter_duff(s, d, 1.0, 1.0 - s[3])
}

fn destination_over(s: Px, d: Px) -> Px {
    porter_duff(s, d, 1.0 - d[3], 1.0)
}

fn source_in(s: Px, d: Px) -> Px {
    porter_duff(s, d, d[3], 0.0)
}

fn destination_in(s: Px, d: Px) -> Px {
    porter_duff(s, d, 0.0, s[3])
}

fn source_out(s: Px, d: Px) -> Px {
    porter_duff(s, d, 1.0 - d[3], 0.0)
}

fn destination_out(s: Px, d: Px) -> Px {
    porter_duff(s, d, 0.0, 1.0 - s[3])
}

fn source_atop(s: Px, d: Px) -> Px {
    porter_duff(s, d, d[3], 1.0 - s[3])
}

fn destination_atop(s: Px, d: Px) -> Px {
    porter_duff(s, d, 1.0 - d[3], s[3])
}

fn xor(s: Px, d: Px) -> Px {
    porter_duff(s, d, 1.0 - d[3], 1.0 - s[3])
}

fn plus(s: Px, d: Px) -> Px {
    [
        (s[0] + d[0]).min(1.0),
        (s[1] + d[1]).min(1.0),
        (s[2] + d[2]).min(1.0),
        (s[3] + d[3]).min(1.0),
    ]
}

fn modulate(s: Px, d: Px) -> Px {
    [s[0] * d[0], s[1] * d[1], s[2] * d[2], s[3] * d[3]]
}

fn unpremul(c: f32, a: f32) -> f32 {
    if a > 0.0 { (c / a).clamp(0.0, 1.0) } else { 0.0 }
}

// Source-over with the blend applied to unpremultiplied channels:
// out_a = sa + da * (1 - sa)
// out_p = sp * (1 - da) + dp * (1 - sa) + B(sc, dc) * sa * da
fn composite_blended(s: Px, d: Px, b: [f32; 3]) -> Px {
    let (sa, da) = (s[3], d[3]);
    let mut out = [0.0f32; 4];
    for c in 0..3 {
        out[c] = (s[c] * (1.0 - da) + d[c] * (1.0 - sa) + b[c].clamp(0.0, 1.0) * sa * da)
            .clamp(0.0, 1.0);
    }
    out[3] = (sa + da * (1.0 - sa)).clamp(0.0, 1.0);
    out
}

#[inline(always)]
fn separable<F>(s: Px, d: Px, blend_fn: F) -> Px
where
    F: Fn(f32, f32) -> f32,
{
    let (sa, da) = (s[3], d[3]);
    let mut b = [0.0f32; 3];
    for c in 0..3 {
        b[c] = blend_fn(unpremul(s[c], sa), unpremul(d[c], da));
    }
    composite_blended(s, d, b)
}

fn screen(s: Px, d: Px) -> Px {
    separable(s, d, |s, d| s + d - s * d)
}

fn overlay(s: Px, d: Px) -> Px {
    separable(s, d, |s, d| hard_light_channel(d, s))
}

fn darken(s: Px, d: Px) -> Px {
    separable(s, d, f32::min)
}

fn lighten(s: Px, d: Px) -> Px {
    separable(s, d, f32::max)
}

fn color_dodge(s: Px, d: Px) -> Px {
    separable(s, d, |s, d| {
        if d <= 0.0 {
            0.0
        } else if s >= 1.0 {
            1.0
        } else {
            (d / (1.0 - s)).min(1.0)
        }
    })
}

fn color_burn(s: Px, d: Px) -> Px {
    separable(s, d, |s, d| {
        if d >= 1.0 {
            1.0
        } else if s <= 0.0 {
            0.0
        } else {
            1.0 - ((1.0 - d) / s).min(1.0)
        }
    })
}

fn hard_light_channel(s: f32, d: f32) -> f32 {
    if s <= 0.5 {
        2.0 * s * d
    } else {
        1.0 - 2.0 * (1.0 - s) * (1.0 - d)
    }
}

fn hard_light(s: Px, d: Px) -> Px {
    separable(s, d, hard_light_channel)
}

fn soft_light(s: Px, d: Px) -> Px {
    separable(s, d, |s, d| {
        if s <= 0.5 {
            d - (1.0 - 2.0 * s) * d * (1.0 - d)
        } else {
            let g = if d <= 0.25 {
                ((16.0 * d - 12.0) * d + 4.0) * d
            } else {
                d.sqrt()
            };
            d + (2.0 * s - 1.0) * (g - d)
        }
    })
}

fn difference(s: Px, d: Px) -> Px {
    separable(s, d, |s, d| (d - s).abs())
}

fn exclusion(s: Px, d: Px) -> Px {
    separable(s, d, |s, d| d + s - 2.0 * d * s)
}

fn multiply(s: Px, d: Px) -> Px {
    separable(s, d, |s, d| s * d)
}

fn lum(c: [f32; 3]) -> f32 {
    0.3 * c[0] + 0.59 * c[1] + 0.11 * c[2]
}

fn clip_color(c: [f32; 3]) -> [f32; 3] {
    let l = lum(c);
    let n = c[0].min(c[1]).min(c[2]);
    let x = c[0].max(c[1]).max(c[2]);
    let mut out = c;
    if n < 0.0 && l - n > 0.0 {
        out = out.map(|v| l + (v - l) * l / (l - n));
    }
    if x > 1.0 && x - l > 0.0 {
        out = out.map(|v| l + (v - l) * (1.0 - l) / (x - l));
    }
    out
}

fn set_lum(c: [f32; 3], l: f32) -> [f32; 3] {
    let d = l - lum(c);
    clip_color(c.map(|v| v + d))
}

fn sat(c: [f32; 3]) -> f32 {
    c[0].max(c[1]).max(c[2]) - c[0].min(c[1]).min(c[2])
}

fn set_sat(c: [f32; 3], s: f32) -> [f32; 3] {
    let mx = c[0].max(c[1]).max(c[2]);
    let mn = c[0].min(c[1]).min(c[2]);
    if mx - mn <= 0.0 {
        return [0.0; 3];
    }
    c.map(|v| (v - mn) * s / (mx - mn))
}

#[inline(always)]
fn non_separable<F>(s: Px, d: Px, blend_fn: F) -> Px
where
    F: Fn([f32; 3], [f32; 3]) -> [f32; 3],
{
    let (sa, da) = (s[3], d[3]);
    let cs = [unpremul(s[0], sa), unpremul(s[1], sa), unpremul(s[2], sa)];
    let cd = [unpremul(d[0], da), unpremul(d[1], da), unpremul(d[2], da)];
    composite_blended(s, d, blend_fn(cs, cd))
}

fn hue(s: Px, d: Px) -> Px {
    non_separable(s, d, |cs, cd| set_lum(set_sat(cs, sat(cd)), lum(cd)))
}

fn saturation(s: Px, d: Px) -> Px {
    non_separable(s, d, |cs, cd| set_lum(set_sat(cd, sat(cs)), lum(cd)))
}

fn color(s: Px, d: Px) -> Px {
    non_separable(s, d, |cs, cd| set_lum(cs, lum(cd)))
}

fn luminosity(s: Px, d: Px) -> Px {
    non_separable(s, d, |cs, cd| set_lum(cd, lum(cs)))
}

/// Nearest sample at texture-space `p`; `None` outside the texture.
pub(crate) fn sample_nearest(data: &[u8], size: ISize, p: Point) -> Option<[u8; 4]> {
    if !(p.x >= 0.0 && p.y >= 0.0) {
        return None;
    }
    let (x, y) = (p.x.floor(), p.y.floor());
    if x >= f64::from(size.width) || y >= f64::from(size.height) {
        return None;
    }
    let idx = ((y as usize) * (size.width as usize) + (x as usize)) * 4;
    Some([data[idx], data[idx + 1], data[idx + 2], data[idx + 3]])
}

/// Nearest sample with coordinates clamped to the texture edge.
pub(crate) fn sample_clamped(data: &[u8], size: ISize, p: Point) -> [u8; 4] {
    if size.is_empty() {
        return [0; 4];
    }
    let x = p.x.floor().clamp(0.0, f64::from(size.width - 1)) as usize;
    let y = p.y.floor().clamp(0.0, f64::from(size.height - 1)) as usize;
    let idx = (y * (size.width as usize) + x) * 4;
    [data[idx], data[idx + 1], data[idx + 2], data[idx + 3]]
}

/// Copy a placed texture into a transparent `dst_size` buffer.
pub(crate) fn rasterize_placed(
    src: &[u8],
    src_size: ISize,
    to_pass: Affine,
    dst: &mut [u8],
    dst_size: ISize,
) -> FilterResult<()> {
    if dst.len() != dst_size.rgba8_len() || src.len() != src_size.rgba8_len() {
        return Err(FilterError::render(
            "rasterize_placed expects buffers matching their sizes",
        ));
    }
    dst.fill(0);
    let inv = to_pass.inverse();
    for y in 0..dst_size.height {
        for x in 0..dst_size.width {
            let p = inv * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            if let Some(px) = sample_nearest(src, src_size, p) {
                let idx = ((y as usize) * (dst_size.width as usize) + (x as usize)) * 4;
                dst[idx..idx + 4].copy_from_slice(&px);
            }
        }
    }
    Ok(())
}

pub(crate) fn gaussian_kernel_q16(radius: u32, sigma: f32) -> FilterResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(FilterError::validation("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(FilterError::render("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let target: i64 = 65536;
    let delta = target - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let mid_val = i64::from(weights[mid]);
        let new_mid = (mid_val + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

/// Convolve along `dir`; samples falling outside the buffer are transparent.
pub(crate) fn directional_blur_q16(src: &[u8], dst: &mut [u8], size: ISize, dir: Vec2, k: &[u32]) {
    if k.len() == 1 {
        dst.copy_from_slice(src);
        return;
    }
    let radius = (k.len() / 2) as i64;
    let (w, h) = (i64::from(size.width), i64::from(size.height));
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let t = (ki as i64 - radius) as f64;
                let sx = (x as f64 + t * dir.x).round() as i64;
                let sy = (y as f64 + t * dir.y).round() as i64;
                if sx < 0 || sy < 0 || sx >= w || sy >= h {
                    continue;
                }
                let idx = ((sy * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

/// Recombine blurred pixels with the unblurred source according to `factors`.
pub(crate) fn apply_blur_style(blurred: &mut [u8], source: Option<&[u8]>, factors: StyleFactors) {
    if factors.inner == 1.0 && factors.outer == 1.0 && factors.src == 0.0 {
        return;
    }
    for (i, b) in blurred.chunks_exact_mut(4).enumerate() {
        let s = match source {
            Some(src) => to_px([src[i * 4], src[i * 4 + 1], src[i * 4 + 2], src[i * 4 + 3]]),
            None => [0.0; 4],
        };
        let blur_factor = factors.inner * s[3] + factors.outer * (1.0 - s[3]);
        let bp = to_px([b[0], b[1], b[2], b[3]]);
        let mut out = [0.0f32; 4];
        for c in 0..4 {
            out[c] = bp[c] * blur_factor + s[c] * factors.src;
        }
        b.copy_from_slice(&from_px(out));
    }
}

/// Inputs for [`border_mask_blur`].
pub(crate) struct BorderMask<'a> {
    pub(crate) src: &'a [u8],
    pub(crate) src_size: ISize,
    /// Pass pixel space to texture pixel space.
    pub(crate) to_texture: Affine,
    pub(crate) sigma_x: f32,
    pub(crate) sigma_y: f32,
    pub(crate) factors: StyleFactors,
}

/// Mask the source by a Gaussian falloff toward its own borders.
pub(crate) fn border_mask_blur(mask: &BorderMask<'_>, dst: &mut [u8], dst_size: ISize) {
    let (w, h) = (
        mask.src_size.width as f32,
        mask.src_size.height as f32,
    );
    let f = mask.factors;
    for y in 0..dst_size.height {
        for x in 0..dst_size.width {
            let p = mask.to_texture * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let (u, v) = (p.x as f32, p.y as f32);
            let falloff = gaussian_integral(u, mask.sigma_x)
                * gaussian_integral(w - u, mask.sigma_x)
                * gaussian_integral(v, mask.sigma_y)
                * gaussian_integral(h - v, mask.sigma_y);
            let within = u >= 0.0 && v >= 0.0 && u < w && v < h;
            let factor = if within {
                f.inner * falloff + f.src
            } else {
                f.outer * falloff
            };
            let color = to_px(sample_clamped(mask.src, mask.src_size, p));
            let idx = ((y as usize) * (dst_size.width as usize) + (x as usize)) * 4;
            dst[idx..idx + 4].copy_from_slice(&from_px(color.map(|c| c * factor)));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/kernels.rs"]
mod tests;
