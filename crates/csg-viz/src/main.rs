use bsp_csg::{BooleanOp, CsgResult, Mesh};
use csg_viz::{OrbitCamera, Scene, draw_faces, draw_wireframe, rotated_cube};
use macroquad::prelude::*;
use nalgebra::{Point3, Rotation3, Vector3};

fn op_name(op: BooleanOp) -> &'static str {
    match op {
        BooleanOp::Combine => "combine",
        BooleanOp::Intersect => "intersect",
        BooleanOp::Subtract => "subtract",
    }
}

fn second_operand(angle: f32) -> CsgResult<Mesh> {
    let rotation = Rotation3::from_axis_angle(&Vector3::y_axis(), angle)
        * Rotation3::from_axis_angle(&Vector3::x_axis(), 0.5);
    rotated_cube(Point3::new(0.5, 0.3, 0.4), 0.9, &rotation)
}

#[macroquad::main("CSG Boolean Operations")]
async fn main() {
    let mut angle = 0.0_f32;
    let operands = Mesh::cuboid(Point3::new(-0.5, -0.5, -0.5), Point3::new(0.5, 0.5, 0.5))
        .and_then(|a| Ok((a, second_operand(angle)?)));
    let (a, b) = match operands {
        Ok(operands) => operands,
        Err(err) => {
            eprintln!("failed to build operands: {err}");
            return;
        }
    };

    let mut show_operands = false;
    let mut scene = Scene::new(a, b, BooleanOp::Combine);
    let mut camera = OrbitCamera::new(4.0, 0.6, 0.4);

    loop {
        camera.update();
        scene.update();

        if is_key_pressed(KeyCode::Space) {
            show_operands = !show_operands;
        }
        if is_key_down(KeyCode::Right) || is_key_down(KeyCode::Left) {
            angle += if is_key_down(KeyCode::Right) { 0.02 } else { -0.02 };
            match second_operand(angle) {
                Ok(b) => scene.set_b(b),
                Err(err) => eprintln!("failed to build rotated cube: {err}"),
            }
        }

        clear_background(Color::from_rgba(20, 20, 30, 255));
        set_camera(&camera.to_camera3d());

        if show_operands {
            draw_wireframe(scene.a.faces(), SKYBLUE);
            draw_wireframe(scene.b.faces(), ORANGE);
        } else {
            draw_faces(scene.result.faces(), Color::from_rgba(200, 180, 120, 255));
            draw_wireframe(scene.result.faces(), Color::from_rgba(40, 40, 40, 255));
        }

        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0), RED);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0), GREEN);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 1.0), BLUE);

        set_default_camera();

        draw_text(
            &format!(
                "{} - {} faces, volume {:.3}",
                op_name(scene.op),
                scene.result.len(),
                scene.result.volume()
            ),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        draw_text(
            "1/2/3: combine/intersect/subtract  Left/Right: rotate B  Space: operands",
            10.0,
            45.0,
            16.0,
            GRAY,
        );
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 65.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
