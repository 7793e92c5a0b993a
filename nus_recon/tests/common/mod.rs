#![allow(dead_code)]

use std::fs;
use std::path::Path;
use nus_recon::{Config, Overrides, WorkflowConfig, WorkflowStage};

const ACQUS:&str = "##$BF1= 600.13
##$DECIM= 1664
##$DSPFVS= 20
##$GRPDLY= 67.9842681884766
##$O1= 2820.96
##$SFO1= 600.1328209
##$SW_h= 6009.6152
##$TD= 2048
##$WBST= 1024
";

fn indirect(bf1:f64,fn_mode:i64,o1:f64,sw:f64) -> String {
    format!("##$BF1= {}\n##$FnMODE= {}\n##$O1= {}\n##$SFO1= {}\n##$SW_h= {}\n",bf1,fn_mode,o1,bf1,sw)
}

pub fn write_data_set(dir:&Path,n_samples:usize,y_mode:i64,z_mode:i64) {
    fs::write(dir.join("acqus"),ACQUS).unwrap();
    fs::write(dir.join("acqu2s"),indirect(60.8131,y_mode,7296.0,1800.0)).unwrap();
    fs::write(dir.join("acqu3s"),indirect(150.903,z_mode,6487.5,8300.0)).unwrap();
    fs::write(dir.join("ser"),[0u8;16]).unwrap();
    fs::write(dir.join("pulseprogram"),"; Echo/Antiecho gradient selection in t2\n1 ze\n").unwrap();
    let nuslist:String = (0..n_samples).map(|i| format!("{} {}\n",i % 16,i / 16)).collect();
    fs::write(dir.join("nuslist"),nuslist).unwrap();
}

pub fn config_for(data_dir:&Path,stage:WorkflowStage) -> WorkflowConfig {
    let c = <WorkflowConfig as Config>::default().merge(&Overrides{
        data_dir:Some(data_dir.to_owned()),
        ..Overrides::default()
    });
    c.with_stage(stage)
}
