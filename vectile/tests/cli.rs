use assert_cmd::{Command, cargo};
use predicates::str::contains;
use std::{
	io::{BufRead, BufReader, Write},
	net::TcpListener,
	path::Path,
	thread,
	time::Duration,
};
use tempfile::{TempDir, tempdir};
use vectile_core::Blob;
use vectile_geometry::{
	GeoProperties, GeometryKind,
	vector_tile::{VectorTile, VectorTileLayer},
};

fn vectile() -> Command {
	Command::new(cargo::cargo_bin!())
}

/// A triangle and a `highway=primary` line in the `tile` layer.
fn two_feature_tile() -> Blob {
	let mut layer = VectorTileLayer::new_standard("tile");
	layer
		.add_feature(
			Some(1),
			GeometryKind::Polygon,
			&[vec![[0, 0], [4096, 0], [2048, 4096]]],
			&GeoProperties::new(),
		)
		.unwrap();
	layer
		.add_feature(
			Some(2),
			GeometryKind::LineString,
			&[vec![[100, 100], [3000, 2000]]],
			&GeoProperties::from(vec![("highway", "primary")]),
		)
		.unwrap();
	VectorTile::new(vec![layer]).to_blob().unwrap()
}

fn write_level(dir: &Path, level: u8) {
	let tile = two_feature_tile();
	for x in 0..(1u32 << level) {
		let column = dir.join(format!("{level}/{x}"));
		std::fs::create_dir_all(&column).unwrap();
		for y in 0..(1u32 << level) {
			tile.save_to_file(&column.join(format!("{y}.pbf"))).unwrap();
		}
	}
}

/// Serves `tile` for every request, answering each one after `delay`.
fn slow_tile_server(tile: Blob, delay: Duration) -> String {
	let listener = TcpListener::bind("127.0.0.1:0").unwrap();
	let url = format!("http://{}", listener.local_addr().unwrap());
	thread::spawn(move || {
		for stream in listener.incoming() {
			let Ok(mut stream) = stream else { continue };
			let tile = tile.clone();
			thread::spawn(move || {
				let mut reader = BufReader::new(stream.try_clone().unwrap());
				let mut line = String::new();
				while reader.read_line(&mut line).is_ok_and(|n| n > 2) {
					line.clear();
				}
				thread::sleep(delay);
				let head = format!(
					"HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
					tile.len()
				);
				let _ = stream.write_all(head.as_bytes());
				let _ = stream.write_all(tile.as_slice());
			});
		}
	});
	url
}

/// A config file next to a `tiles/` directory.
fn setup(config: &str) -> (TempDir, String) {
	let dir = tempdir().unwrap();
	std::fs::create_dir_all(dir.path().join("tiles")).unwrap();
	let path = dir.path().join("vectile.yml");
	std::fs::write(&path, config).unwrap();
	let path = path.to_string_lossy().to_string();
	(dir, path)
}

#[test]
fn decode_prints_features() {
	let dir = tempdir().unwrap();
	let file = dir.path().join("tile.pbf");
	two_feature_tile().save_to_file(&file).unwrap();

	vectile()
		.args(["decode", file.to_str().unwrap()])
		.assert()
		.success()
		.stdout(contains("layer 'tile' (extent 4096): 2 features"))
		.stdout(contains("Polygon(3) [[0, 0], [4096, 0], [2048, 4096]]"))
		.stdout(contains(r#"LineString(2) [[100, 100], [3000, 2000]] {"highway": String("primary")}"#));
}

#[test]
fn decode_all_layers() {
	let dir = tempdir().unwrap();
	let file = dir.path().join("tile.pbf");
	two_feature_tile().save_to_file(&file).unwrap();

	vectile()
		.args(["decode", "--all-layers", file.to_str().unwrap()])
		.assert()
		.success()
		.stdout(contains("layer 'tile': 2 features"));
}

#[test]
fn decode_rejects_malformed_tiles() {
	let dir = tempdir().unwrap();
	let file = dir.path().join("broken.pbf");
	std::fs::write(&file, [0x1a, 0x7f, 0x00]).unwrap();

	vectile()
		.args(["decode", file.to_str().unwrap()])
		.assert()
		.failure()
		.stderr(contains("Failed to parse vector tile"));
}

#[test]
fn decode_missing_file() {
	vectile()
		.args(["decode", "/nonexistent/tile.pbf"])
		.assert()
		.failure()
		.stderr(contains("Failed to read /nonexistent/tile.pbf"));
}

#[test]
fn config_prints_defaults() {
	vectile()
		.arg("config")
		.assert()
		.success()
		.stdout(contains("tile_size: 256"))
		.stdout(contains("max_cache_entries: 300"))
		.stdout(contains("cross_fade_threshold: 0.3"));
}

#[test]
fn config_validates_files() {
	let (_dir, path) = setup("min_zoom: 9\nmax_zoom: 3\n");
	vectile()
		.args(["config", "--config", &path])
		.assert()
		.failure()
		.stderr(contains("min_zoom (9) must be <= max_zoom (3)"));
}

#[test]
fn render_writes_a_png() {
	let (dir, path) = setup("tile_base_url: tiles\nmin_zoom: 2\nmax_zoom: 4\nfade_in_ms: 0\nbackground: '#ffffff'\n");
	write_level(&dir.path().join("tiles"), 2);
	let out = dir.path().join("frame.png");

	vectile()
		.args(["render", "--config", &path, "--lat", "0", "--lon", "0", "--zoom", "2"])
		.args(["--width", "256", "--height", "192", "--out", out.to_str().unwrap()])
		.assert()
		.success();

	let image = image::open(&out).unwrap().to_rgba8();
	assert_eq!(image.dimensions(), (256, 192));
	assert!(image.pixels().any(|p| p.0 != [255, 255, 255, 255]));
}

#[test]
fn render_without_tiles_draws_background() {
	let (dir, path) = setup("tile_base_url: tiles\nfade_in_ms: 0\nbackground: '#102030'\n");
	let out = dir.path().join("empty.png");

	vectile()
		.args(["render", "--config", &path, "--lat", "-33.9", "--lon", "18.4", "--zoom", "5.5"])
		.args(["--width", "64", "--height", "64", "--out", out.to_str().unwrap()])
		.assert()
		.success();

	let image = image::open(&out).unwrap().to_rgba8();
	assert!(image.pixels().all(|p| p.0 == [16, 32, 48, 255]));
}

#[test]
fn render_requires_a_tile_source() {
	let (dir, path) = setup("fade_in_ms: 0\n");
	let out = dir.path().join("never.png");

	vectile()
		.args(["render", "--config", &path, "--lat", "0", "--lon", "0", "--zoom", "3"])
		.args(["--out", out.to_str().unwrap()])
		.assert()
		.failure()
		.stderr(contains("tile_base_url must be set"));
	assert!(!out.exists());
}

#[test]
fn render_waits_for_slow_tiles() {
	let url = slow_tile_server(two_feature_tile(), Duration::from_millis(400));
	let (dir, path) = setup(&format!(
		"tile_base_url: {url}\nmin_zoom: 2\nmax_zoom: 4\nfade_in_ms: 0\nfetch_timeout_ms: 5000\nbackground: '#ffffff'\n"
	));
	let out = dir.path().join("slow.png");

	vectile()
		.args(["render", "--config", &path, "--lat", "0", "--lon", "0", "--zoom", "2"])
		.args(["--width", "256", "--height", "192", "--out", out.to_str().unwrap()])
		.assert()
		.success();

	let image = image::open(&out).unwrap().to_rgba8();
	assert!(image.pixels().any(|p| p.0 != [255, 255, 255, 255]));
}
