/*
 * Demo driver: loads a switcher configuration (the JSON file named on the
 * command line, or a built-in set of Carto basemaps), mounts the component on
 * a `HeadlessMap`, and replays a short user session (hover, pick a style,
 * flip the OS color scheme, move the control) while printing the rendered
 * markup after each step.
 */
use map_style_switcher::bindings::{StyleSwitcherComponent, StyleSwitcherProps};
use map_style_switcher::model::{SwitcherConfigFile, load_config, parse_config};
use map_style_switcher::platform_layer::{ManualColorScheme, NodeId};
use map_style_switcher::{
    ControlPosition, DomEvent, EngineFlavor, HeadlessMap, MapEngine, StyleSwitcherControl,
};
use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::rc::{Rc, Weak};

const BUILTIN_CONFIG: &str = r#"{
  "styles": [
    {
      "id": "voyager",
      "name": "Voyager",
      "image": "https://example.com/voyager.png",
      "styleUrl": "https://basemaps.cartocdn.com/gl/voyager-gl-style/style.json",
      "description": "Voyager style from Carto"
    },
    {
      "id": "positron",
      "name": "Positron",
      "image": "https://example.com/positron.png",
      "styleUrl": "https://basemaps.cartocdn.com/gl/positron-gl-style/style.json",
      "description": "Positron style from Carto"
    },
    {
      "id": "dark-matter",
      "name": "Dark Matter",
      "image": "https://example.com/dark.png",
      "styleUrl": "https://basemaps.cartocdn.com/gl/dark-matter-gl-style/style.json",
      "description": "Dark Matter style from Carto"
    }
  ],
  "theme": "auto"
}"#;

fn read_config() -> Result<SwitcherConfigFile, Box<dyn Error>> {
    match env::args().nth(1) {
        Some(path) => Ok(load_config(&PathBuf::from(path))?),
        None => {
            log::info!("No configuration file given, using the built-in Carto styles.");
            Ok(parse_config(BUILTIN_CONFIG)?)
        }
    }
}

fn print_markup(map: &HeadlessMap, step: &str) {
    let markup = map.document().borrow().to_html(map.container());
    match markup {
        Ok(html) => println!("--- {step} ---\n{html}\n"),
        Err(e) => log::error!("Could not serialise the map container: {e}"),
    }
}

fn entry_for(control: &StyleSwitcherControl, style_id: &str) -> Option<NodeId> {
    let entry = control.entry_node(style_id);
    if entry.is_none() {
        log::warn!("No rendered entry for style '{style_id}'");
    }
    entry
}

fn main() -> Result<(), Box<dyn Error>> {
    map_style_switcher::initialize_logging();

    let (options, position) = read_config()?.into_options();
    let first_url = options.styles.first().map(|style| style.style_url.clone());
    let second_id = options.styles.iter().nth(1).map(|style| style.id.clone());

    let color_scheme = Rc::new(ManualColorScheme::new(false));
    let map = Rc::new(HeadlessMap::with_color_scheme(
        EngineFlavor::MapLibre,
        color_scheme.clone(),
    ));
    if let Some(url) = first_url {
        map.set_style(&url);
    }

    let weak_map: Weak<HeadlessMap> = Rc::downgrade(&map);
    let props = StyleSwitcherProps::new(options.clone())
        .position(position)
        .on_style_change(move |url| {
            if let Some(map) = weak_map.upgrade() {
                map.set_style(url);
            }
        });
    let engine: Rc<dyn MapEngine> = map.clone();
    let mut component = StyleSwitcherComponent::mount(engine, props)?;
    let control = component.control();
    print_markup(&map, "mounted");

    if let Some(root) = control.root() {
        map.dispatch_event(root, DomEvent::PointerEnter);
        print_markup(&map, "hovered");
    }

    if let Some(entry) = second_id.as_deref().and_then(|id| entry_for(&control, id)) {
        map.dispatch_event(entry, DomEvent::Click);
        println!("Map style is now {:?}\n", map.style_url());
    }

    color_scheme.set_prefers_dark(true);
    print_markup(&map, "OS switched to dark");

    let moved = StyleSwitcherProps::new(options)
        .position(ControlPosition::BottomRight)
        .on_style_change(|url| println!("Style changed to {url}"));
    component.set_props(moved)?;
    print_markup(&map, "moved to bottom-right");

    component.unmount();
    println!("Style history: {:?}", map.style_history());
    Ok(())
}
