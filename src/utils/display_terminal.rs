//! 터미널 출력 포맷팅
//!
//! 기동 단계의 레지스트리 초기화 진행 상황과 BOM 정리 결과를 박스 형태로 출력합니다.

const BOX_WIDTH: usize = 50;

pub fn print_boxed_title(title: &str) {
    let border = "═".repeat(BOX_WIDTH);
    println!("╔{}╗", border);
    println!("║{:^49}║", title);
    println!("╚{}╝", border);
}

pub fn print_step_start(step: u8, description: &str) {
    println!("→ Step {}: {}", step, description);
}

pub fn print_step_complete(step: u8, description: &str, count: usize) {
    println!("✓ Step {}: {} ({} items)", step, description, count);
}

pub fn print_sub_task(name: &str, status: &str) {
    println!("   ├─ {}: {}", name, status);
}

pub fn print_final_summary(repos: usize, services: usize) {
    println!();
    print_boxed_title("🎉 SERVICE REGISTRY INITIALIZED");
    println!("   📦 Repositories: {}", repos);
    println!("   🔧 Services: {}", services);
    println!("   🚀 Total Components: {}", repos + services);
    println!();
}

pub fn print_cache_initialized(cache_type: &str, count: usize) {
    println!("   ├─ {} Cache: {} entries loaded", cache_type, count);
}

/// BOM 정리 결과 요약
pub fn print_bom_summary(root: &str, scanned: usize, stripped: &[String]) {
    print_boxed_title("🧹 STRIP BOM");
    println!("   📂 Root: {}", root);
    println!("   🔍 Scanned: {}", scanned);
    println!("   ✂️  Stripped: {}", stripped.len());
    for path in stripped {
        print_sub_task(path, "BOM removed");
    }
}
