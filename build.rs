use dotenvy::dotenv;

const ENV_KEYS: [(&str, &str); 5] = [
  ("BACKEND_URL", "http://localhost:8080"),
  ("KAKAO_CLIENT_ID", ""),
  ("KAKAO_AUTH_SERVER_URL", "https://kauth.kakao.com"),
  ("GOOGLE_CLIENT_ID", ""),
  ("TOSS_CLIENT_KEY", ""),
];

fn main() {
  // Tell Cargo that if the env file changes, to rerun this build script.
  println!("cargo::rerun-if-changed=.env");

  if dotenv().is_err() {
    println!("cargo::warning=no .env file found, using process environment and defaults");
  }

  for (key, default) in ENV_KEYS {
    println!("cargo::rerun-if-env-changed={}", key);
    match std::env::var(key) {
      Ok(value) => println!("cargo::rustc-env={}={}", key, value),
      Err(_) => {
        println!("cargo::warning={} is not set, falling back to \"{}\"", key, default);
        println!("cargo::rustc-env={}={}", key, default);
      }
    }
  }
}
