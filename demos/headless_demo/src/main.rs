// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless frame loop that exercises the whole pipeline.
//!
//! Loads a small layout through [`LayoutHandler`], then runs a handful of
//! frames through a [`Renderer`] backed by a
//! [`RecordingBackend`](casement_render::RecordingBackend) with the GL vertex
//! layout. Each frame mutates the tree a little so the geometry cache has
//! something to do. Renderer events are pretty-printed to stdout, tree events
//! are recorded and exported as JSON at the end.

use std::cell::Cell;
use std::fs::File;
use std::io::BufWriter;
use std::rc::Rc;

use casement_core::collab::{LayoutHandler, XmlAttributes, XmlHandler};
use casement_core::property::UserProperty;
use casement_core::window::{TemplateFactory, TreeConfig, WindowEvent, WindowTree};
use casement_render::layout::GlVertex;
use casement_render::{
    Colour, FillPainter, GeometryCache, RecordingBackend, Renderer, RendererConfig,
};
use kurbo::Point;

use casement_debug::pretty::PrettyPrintSink;
use casement_debug::recorder::RecorderSink;

/// One parser callback.
enum Node {
    Start(&'static str, &'static [(&'static str, &'static str)]),
    Text(&'static str),
    End(&'static str),
}

/// The callbacks an XML parser would produce for the demo layout.
const LAYOUT: &[Node] = &[
    Node::Start("GUILayout", &[]),
    Node::Start("Window", &[("Type", "Panel"), ("Name", "Root")]),
    Node::Start(
        "Property",
        &[
            ("Name", "UnifiedAreaRect"),
            ("Value", "{{0,40},{0,40},{0,600},{0,440}}"),
        ],
    ),
    Node::End("Property"),
    Node::Start("Window", &[("Type", "Panel"), ("Name", "Root/Toolbar")]),
    Node::Start(
        "Property",
        &[
            ("Name", "UnifiedAreaRect"),
            ("Value", "{{0,0},{0,0},{1,0},{0,32}}"),
        ],
    ),
    Node::End("Property"),
    Node::Start("Property", &[("Name", "FillColour")]),
    Node::Text("FF303848"),
    Node::End("Property"),
    Node::Start("Window", &[("Type", "Panel"), ("Name", "Root/Toolbar/Ok")]),
    Node::Start(
        "Property",
        &[
            ("Name", "UnifiedAreaRect"),
            ("Value", "{{0,4},{0,4},{0,84},{0,28}}"),
        ],
    ),
    Node::End("Property"),
    Node::Start("Property", &[("Name", "FillColour"), ("Value", "FF3C7DD9")]),
    Node::End("Property"),
    Node::End("Window"),
    Node::End("Window"),
    Node::Start("Window", &[("Type", "Panel"), ("Name", "Root/Status")]),
    Node::Start(
        "Property",
        &[
            ("Name", "UnifiedAreaRect"),
            ("Value", "{{0,0},{1,-24},{1,0},{1,0}}"),
        ],
    ),
    Node::End("Property"),
    Node::Start("Property", &[("Name", "Alpha"), ("Value", "0.75")]),
    Node::End("Property"),
    Node::End("Window"),
    Node::End("Window"),
    Node::End("GUILayout"),
];

const FRAME_COUNT: u64 = 5;

fn load_layout(tree: &mut WindowTree) -> casement_core::window::WindowId {
    let mut handler = LayoutHandler::new(tree);
    for node in LAYOUT {
        match node {
            Node::Start(element, attrs) => {
                let mut attributes = XmlAttributes::new();
                for (name, value) in *attrs {
                    attributes.add(name, value);
                }
                handler
                    .element_start(element, &attributes)
                    .expect("layout element rejected");
            }
            Node::Text(text) => handler.text(text).expect("layout text rejected"),
            Node::End(element) => handler
                .element_end(element)
                .expect("layout element rejected"),
        }
    }
    handler.finish().expect("layout defines no window")
}

fn main() {
    // -- sinks -------------------------------------------------------------
    let recorder = RecorderSink::new();
    let pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));

    // -- tree --------------------------------------------------------------
    let mut tree = WindowTree::new(TreeConfig::hd());
    tree.set_trace_sink(Box::new(recorder.clone()));
    tree.add_factory(Box::new(
        TemplateFactory::new("Panel").with_user_property(
            UserProperty::new(FillPainter::PROPERTY, "FF202020")
                .with_help("Background colour as AARRGGBB hex"),
        ),
    ))
    .expect("Panel registered twice");

    let root = load_layout(&mut tree);
    let toolbar = tree.get_window("Root/Toolbar").expect("toolbar missing");
    let ok = tree.get_window("Root/Toolbar/Ok").expect("button missing");
    let status = tree.get_window("Root/Status").expect("status bar missing");

    let ok_renders = Rc::new(Cell::new(0_u32));
    let counter = Rc::clone(&ok_renders);
    let _connection = tree
        .subscribe_event(ok, WindowEvent::StartRender.name(), move |_| {
            counter.set(counter.get() + 1);
            false
        })
        .expect("StartRender is a window event");

    // -- renderer ----------------------------------------------------------
    let mut renderer = Renderer::new(
        RecordingBackend::<GlVertex>::new(),
        RendererConfig::gl().with_max_batch_vertices(4096),
    );
    renderer.set_trace_sink(Box::new(pretty));
    let mut painter = FillPainter::new(Colour::BLACK);
    let mut cache = GeometryCache::new();

    // -- frame loop --------------------------------------------------------
    for frame in 1..=FRAME_COUNT {
        match frame {
            3 => tree
                .set_property(ok, FillPainter::PROPERTY, "FFE04040")
                .expect("FillColour is defined on panels"),
            4 => tree.set_pixel_position(root, Point::new(80.0, 60.0)),
            5 => {
                tree.activate(toolbar);
                _ = tree.capture_input(ok);
                tree.release_input(ok);
                tree.destroy_window(status);
            }
            _ => {}
        }

        let changes = tree.evaluate();
        renderer.backend_mut().clear_commands();
        casement_render::draw_tree(&mut tree, &mut renderer, &mut painter, &mut cache, &changes)
            .expect("drawing failed");
        let summary = renderer.render().expect("render failed");

        println!(
            "frame {frame}: {} invalidated, {} draws, {} of {} windows from cache",
            changes.invalidated.len(),
            renderer.backend().draws().count(),
            summary.cache_hits,
            summary.windows_drawn,
        );
    }
    println!("Ok button rendered {} times", ok_renders.get());

    // -- export ------------------------------------------------------------
    let path = "casement-trace.json";
    let file = File::create(path).expect("failed to create trace file");
    let mut writer = BufWriter::new(file);
    casement_debug::json::export(&recorder.bytes(), &mut writer).expect("failed to write trace");

    println!("Wrote {path} ({} tree events)", recorder.events().len());
}
